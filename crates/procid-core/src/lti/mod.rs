//! Linear time-invariant toolkit: polynomials, transfer functions, Padé
//! dead-time approximation and state-space simulation.

pub mod expm;
pub mod pade;
pub mod polynomial;
pub mod statespace;
pub mod transfer_function;

use thiserror::Error;

pub use pade::pade;
pub use statespace::{FohStep, StateSpace};
pub use transfer_function::TransferFunction;

/// Errors raised while building or realizing a transfer function
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LtiError {
    #[error("Denominator is empty or all zeros")]
    ZeroDenominator,

    #[error("Coefficient {0} is not finite")]
    NonFinite(f64),

    #[error("Improper transfer function: numerator order {num} exceeds denominator order {den}")]
    Improper { num: usize, den: usize },

    #[error("Dead time must be finite and non-negative, got {0}")]
    InvalidDelay(f64),

    #[error("Time constant must be finite and positive, got {0}")]
    InvalidTimeConstant(f64),
}
