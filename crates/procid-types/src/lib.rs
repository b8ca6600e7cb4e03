//! Shared types for procid.
//!
//! This crate defines the plain data records exchanged between the
//! identification core and its callers:
//! - Step-response experiments and simulated traces
//! - FOPDT model parameters and PID gains
//! - Identification and simulation settings

mod experiment;
mod params;
mod settings;

pub use experiment::*;
pub use params::*;
pub use settings::*;
