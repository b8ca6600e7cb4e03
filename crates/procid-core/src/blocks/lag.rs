//! First-order lag

use crate::block::Block;

/// `tau * dy/dt = gain * u - y`, starting at rest.
///
/// The step uses the exact solution for an input held over `dt`, so it is
/// stable for any step size.
#[derive(Debug, Clone)]
pub struct FirstOrderLag {
    gain: f64,
    tau: f64,
    u: f64,
    y: f64,
}

impl FirstOrderLag {
    /// `tau` must be positive
    pub fn new(gain: f64, tau: f64) -> Self {
        Self {
            gain,
            tau,
            u: 0.0,
            y: 0.0,
        }
    }
}

impl Block for FirstOrderLag {
    fn set_input(&mut self, u: f64) {
        self.u = u;
    }

    fn update(&mut self, _t: f64) -> f64 {
        self.y
    }

    fn step(&mut self, _t: f64, dt: f64) {
        let decay = (-dt / self.tau).exp();
        self.y = decay * self.y + (1.0 - decay) * self.gain * self.u;
    }
}
