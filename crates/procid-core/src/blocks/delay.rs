//! Pure transport delay

use crate::block::Block;
use crate::utils::constants::FLAT_PAIR_EPS;

/// `y(t) = u(t - delay)`, zero before the first recorded input.
///
/// Each `update` records `(t, u)`; delayed values are read back by linear
/// interpolation, so the delay does not have to be a multiple of the step.
#[derive(Debug, Clone)]
pub struct TransportDelay {
    delay: f64,
    u: f64,
    /// `(t, u)` pairs, increasing in `t`
    history: Vec<(f64, f64)>,
}

impl TransportDelay {
    /// Negative delays are treated as zero
    pub fn new(delay: f64) -> Self {
        Self {
            delay: delay.max(0.0),
            u: 0.0,
            history: Vec::new(),
        }
    }

    fn record(&mut self, t: f64) {
        match self.history.last_mut() {
            Some(last) if last.0 == t => last.1 = self.u,
            Some(last) if last.0 > t => {}
            _ => self.history.push((t, self.u)),
        }
    }

    fn lookup(&self, at: f64) -> f64 {
        let i = self.history.partition_point(|&(t, _)| t <= at);
        if i == 0 {
            return 0.0;
        }
        let (t0, u0) = self.history[i - 1];
        match self.history.get(i) {
            Some(&(t1, u1)) if t1 - t0 > FLAT_PAIR_EPS => u0 + (at - t0) / (t1 - t0) * (u1 - u0),
            _ => u0,
        }
    }
}

impl Block for TransportDelay {
    fn set_input(&mut self, u: f64) {
        self.u = u;
    }

    fn update(&mut self, t: f64) -> f64 {
        self.record(t);
        self.lookup(t - self.delay)
    }

    fn step(&mut self, t: f64, dt: f64) {
        // Oldest sample still needed to interpolate at the next read
        let oldest = t + dt - self.delay;
        let stale = self
            .history
            .partition_point(|&(ts, _)| ts <= oldest)
            .saturating_sub(1);
        self.history.drain(..stale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_output_zero_until_delay_elapsed() {
        let mut delay = TransportDelay::new(0.5);
        for k in 0..=100 {
            let t = k as f64 * 0.01;
            delay.set_input(1.0);
            let y = delay.update(t);
            if t < 0.49 {
                assert_eq!(y, 0.0);
            } else if t > 0.51 {
                assert_relative_eq!(y, 1.0);
            }
            delay.step(t, 0.01);
        }
    }

    #[test]
    fn test_fractional_delay_interpolates() {
        // u(t) = t delayed by 0.25 on a 0.1 grid
        let mut delay = TransportDelay::new(0.25);
        for k in 0..20 {
            let t = k as f64 * 0.1;
            delay.set_input(t);
            let y = delay.update(t);
            if t > 0.3 {
                assert_relative_eq!(y, t - 0.25, epsilon = 1e-12);
            }
            delay.step(t, 0.1);
        }
    }

    #[test]
    fn test_zero_delay_passes_through() {
        let mut delay = TransportDelay::new(0.0);
        delay.set_input(3.0);
        assert_eq!(delay.update(1.0), 3.0);
    }

    #[test]
    fn test_history_stays_bounded() {
        let mut delay = TransportDelay::new(0.05);
        for k in 0..1000 {
            let t = k as f64 * 0.01;
            delay.set_input(1.0);
            delay.update(t);
            delay.step(t, 0.01);
        }
        assert!(delay.history.len() < 10);
    }
}
