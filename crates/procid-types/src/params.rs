//! Model and controller parameter records.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a parameter record violates its invariants
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("Integral time must be strictly positive, got {0}")]
    NonPositiveIntegralTime(f64),

    #[error("Derivative time must be non-negative, got {0}")]
    NegativeDerivativeTime(f64),

    #[error("Parameter '{name}' is not finite ({value})")]
    NonFinite { name: &'static str, value: f64 },
}

/// First-order-plus-dead-time plant parameters
///
/// Describes `G(s) = k * exp(-theta*s) / (tau*s + 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FopdtParams {
    /// Static gain
    pub k: f64,
    /// Time constant in seconds
    pub tau: f64,
    /// Dead time in seconds
    pub theta: f64,
}

impl FopdtParams {
    pub fn new(k: f64, tau: f64, theta: f64) -> Self {
        Self { k, tau, theta }
    }

    /// Relative deviation of each parameter from `other`, as `(k, tau, theta)`.
    ///
    /// A zero reference value yields the absolute deviation instead.
    pub fn relative_error(&self, other: &FopdtParams) -> (f64, f64, f64) {
        fn rel(a: f64, b: f64) -> f64 {
            if b.abs() > 0.0 {
                (a - b).abs() / b.abs()
            } else {
                (a - b).abs()
            }
        }
        (
            rel(self.k, other.k),
            rel(self.tau, other.tau),
            rel(self.theta, other.theta),
        )
    }
}

/// Ideal (parallel, non-interacting) PID gains
///
/// `C(s) = kp * (1 + 1/(ti*s) + td*s)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    /// Proportional gain
    pub kp: f64,
    /// Integral time in seconds (strictly positive)
    pub ti: f64,
    /// Derivative time in seconds (non-negative)
    pub td: f64,
}

impl PidGains {
    /// Create gains, checking `ti > 0`, `td >= 0` and finiteness
    pub fn new(kp: f64, ti: f64, td: f64) -> Result<Self, ParamError> {
        let gains = Self { kp, ti, td };
        gains.validate()?;
        Ok(gains)
    }

    /// Check the invariants of a possibly hand-built record
    pub fn validate(&self) -> Result<(), ParamError> {
        for (name, value) in [("kp", self.kp), ("ti", self.ti), ("td", self.td)] {
            if !value.is_finite() {
                return Err(ParamError::NonFinite { name, value });
            }
        }
        if self.ti <= 0.0 {
            return Err(ParamError::NonPositiveIntegralTime(self.ti));
        }
        if self.td < 0.0 {
            return Err(ParamError::NegativeDerivativeTime(self.td));
        }
        Ok(())
    }

    /// Integral gain `kp / ti`
    pub fn ki(&self) -> f64 {
        self.kp / self.ti
    }

    /// Derivative gain `kp * td`
    pub fn kd(&self) -> f64 {
        self.kp * self.td
    }
}

/// Result of one identification run: fitted FOPDT parameters plus fit error
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdentifiedModel {
    pub k: f64,
    pub tau: f64,
    pub theta: f64,
    /// Mean squared error between model and experimental output
    pub eqm: f64,
}

impl IdentifiedModel {
    /// The plant parameters without the fit error
    pub fn params(&self) -> FopdtParams {
        FopdtParams::new(self.k, self.tau, self.theta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid_gains_rejects_zero_ti() {
        assert_eq!(
            PidGains::new(1.0, 0.0, 0.0),
            Err(ParamError::NonPositiveIntegralTime(0.0))
        );
    }

    #[test]
    fn test_pid_gains_rejects_negative_td() {
        assert!(matches!(
            PidGains::new(1.0, 1.0, -0.5),
            Err(ParamError::NegativeDerivativeTime(_))
        ));
    }

    #[test]
    fn test_pid_gains_rejects_nan() {
        assert!(matches!(
            PidGains::new(f64::NAN, 1.0, 0.0),
            Err(ParamError::NonFinite { name: "kp", .. })
        ));
    }

    #[test]
    fn test_pid_derived_gains() {
        let gains = PidGains::new(2.0, 4.0, 0.5).unwrap();
        assert_eq!(gains.ki(), 0.5);
        assert_eq!(gains.kd(), 1.0);
    }

    #[test]
    fn test_relative_error_handles_zero_reference() {
        let a = FopdtParams::new(2.2, 10.0, 0.1);
        let b = FopdtParams::new(2.0, 10.0, 0.0);
        let (ek, etau, etheta) = a.relative_error(&b);
        assert!((ek - 0.1).abs() < 1e-12);
        assert_eq!(etau, 0.0);
        assert!((etheta - 0.1).abs() < 1e-12);
    }
}
