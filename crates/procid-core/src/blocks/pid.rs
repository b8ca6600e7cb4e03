//! Ideal PID acting on the tracking error

use procid_types::PidGains;

use crate::block::Block;

/// `u = kp*e + ki*∫e dt + kd*de/dt` with `ki = Kp/Ti`, `kd = Kp*Td`.
///
/// Trapezoidal integral, backward-difference derivative over the last step
/// (zero on the first sample).
#[derive(Debug, Clone)]
pub struct Pid {
    kp: f64,
    ki: f64,
    kd: f64,
    error: f64,
    last_error: f64,
    last_dt: f64,
    integral: f64,
}

impl Pid {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self {
            kp,
            ki,
            kd,
            error: 0.0,
            last_error: 0.0,
            last_dt: 0.0,
            integral: 0.0,
        }
    }

    pub fn from_gains(gains: &PidGains) -> Self {
        Self::new(gains.kp, gains.ki(), gains.kd())
    }
}

impl Block for Pid {
    fn set_input(&mut self, error: f64) {
        self.error = error;
    }

    fn update(&mut self, _t: f64) -> f64 {
        let rate = if self.last_dt > 0.0 {
            (self.error - self.last_error) / self.last_dt
        } else {
            0.0
        };
        self.kp * self.error + self.ki * self.integral + self.kd * rate
    }

    fn step(&mut self, _t: f64, dt: f64) {
        self.integral += 0.5 * dt * (self.error + self.last_error);
        self.last_error = self.error;
        self.last_dt = dt;
    }
}
