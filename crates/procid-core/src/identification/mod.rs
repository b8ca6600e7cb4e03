//! Two-point graphical identification of FOPDT models from step responses
//!
//! The trace is smoothed, two characteristic crossing times are located and
//! converted to `(K, tau, theta)`, and the fitted model is simulated on the
//! experimental grid to report its mean squared error.

pub mod crossing;
mod smith;

use procid_types::{IdentifiedModel, TwoPointMethod, Trace};
use thiserror::Error;

use crate::plant::{SimulationError, SimulationQuality};
use crate::smoothing::SmoothingStatus;
use crate::utils::constants::{
    SMITH_HIGH_LEVEL, SMITH_LOW_LEVEL, SUNDARESAN_HIGH_LEVEL, SUNDARESAN_LOW_LEVEL,
};

pub use crossing::Crossing;
pub use smith::{identify, SmithIdentifier};

/// Identification errors; everything not listed here degrades instead
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IdentificationError {
    #[error("Time or output series is empty")]
    EmptySeries,

    #[error("Time has {time} samples but output has {output}")]
    LengthMismatch { time: usize, output: usize },

    #[error("Series '{name}' contains a non-finite value at index {index}")]
    NonFinite { name: &'static str, index: usize },

    #[error("Model validation failed: {0}")]
    Simulation(#[from] SimulationError),
}

/// How an identification run arrived at its parameters
#[derive(Debug, Clone, PartialEq)]
pub struct IdentificationDiagnostics {
    pub method: TwoPointMethod,
    pub smoothing: SmoothingStatus,
    /// Output levels searched for, `(low, high)`
    pub levels: (f64, f64),
    pub first: Crossing,
    pub second: Crossing,
    /// `tau` was raised to the floor
    pub tau_clamped: bool,
    /// A negative `theta` was raised to 0
    pub theta_clamped: bool,
    /// Quality of the validation simulation
    pub simulation: SimulationQuality,
}

/// Result of one identification run
#[derive(Debug, Clone, PartialEq)]
pub struct Identification {
    pub params: IdentifiedModel,
    /// Model response on the experimental grid
    pub model: Trace,
    pub diagnostics: IdentificationDiagnostics,
}

/// Fractions of the output change located by each method
pub fn method_levels(method: TwoPointMethod) -> (f64, f64) {
    match method {
        TwoPointMethod::Smith => (SMITH_LOW_LEVEL, SMITH_HIGH_LEVEL),
        TwoPointMethod::Sundaresan => (SUNDARESAN_LOW_LEVEL, SUNDARESAN_HIGH_LEVEL),
    }
}

/// Unclamped `(tau, theta)` from the two crossing times
pub fn two_point_params(method: TwoPointMethod, t1: f64, t2: f64) -> (f64, f64) {
    match method {
        TwoPointMethod::Smith => {
            let tau = 1.5 * (t2 - t1);
            (tau, t2 - tau)
        }
        TwoPointMethod::Sundaresan => (0.67 * (t2 - t1), 1.3 * t1 - 0.29 * t2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_smith_formula() {
        let (tau, theta) = two_point_params(TwoPointMethod::Smith, 4.0, 8.0);
        assert_relative_eq!(tau, 6.0);
        assert_relative_eq!(theta, 2.0);
    }

    #[test]
    fn test_sundaresan_formula() {
        let (tau, theta) = two_point_params(TwoPointMethod::Sundaresan, 1.0, 3.0);
        assert_relative_eq!(tau, 1.34);
        assert_relative_eq!(theta, 1.3 - 0.87);
    }

    #[test]
    fn test_levels() {
        assert_eq!(method_levels(TwoPointMethod::Smith), (0.283, 0.632));
        assert_eq!(method_levels(TwoPointMethod::Sundaresan), (0.353, 0.853));
    }
}
