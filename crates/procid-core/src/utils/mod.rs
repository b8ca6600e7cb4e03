//! Utility modules

pub mod constants;
pub mod interp;

pub use constants::*;
pub use interp::{interp_clamped, resample, resample_by_index};
