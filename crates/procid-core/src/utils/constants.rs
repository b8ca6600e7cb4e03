//! Numerical constants and defaults

pub use procid_types::{DEFAULT_PADE_ORDER, DEFAULT_SMOOTHING_POLYORDER, DEFAULT_SMOOTHING_WINDOW};

/// Lower bound applied to identified time constants
pub const TAU_FLOOR: f64 = 1e-6;

/// Smallest trace length that is smoothed
pub const MIN_SMOOTHING_SAMPLES: usize = 5;

/// Smith method reference levels (fractions of the output change)
pub const SMITH_LOW_LEVEL: f64 = 0.283;
pub const SMITH_HIGH_LEVEL: f64 = 0.632;

/// Sundaresan-Krishnaswamy reference levels
pub const SUNDARESAN_LOW_LEVEL: f64 = 0.353;
pub const SUNDARESAN_HIGH_LEVEL: f64 = 0.853;

/// Fraction of the trailing samples averaged to estimate a final value
pub const STEADY_STATE_FRACTION: f64 = 0.05;

/// Final values smaller than this make relative overshoot undefined
pub const OVERSHOOT_EPS: f64 = 1e-9;

/// Default settling band, relative to the final value
pub const SETTLING_TOLERANCE: f64 = 0.02;

/// Default rise-time levels
pub const RISE_LOW: f64 = 0.10;
pub const RISE_HIGH: f64 = 0.90;

/// Sample pairs closer than this in value are treated as flat
pub const FLAT_PAIR_EPS: f64 = 1e-12;

/// Relative tolerance under which two grid intervals share a discretization
pub const DT_REUSE_TOLERANCE: f64 = 1e-9;

/// Upper bound on RK4 sub-steps within one grid interval
pub const RK4_MAX_SUBSTEPS: usize = 20_000;

/// Target for `h * pole_bound` when choosing RK4 sub-steps
pub const RK4_STABILITY_TARGET: f64 = 1.0;

/// Fallback simulator: sub-steps per shortest time scale
pub const FALLBACK_STEPS_PER_SCALE: f64 = 20.0;

/// Fallback simulator: sub-step cap per grid interval
pub const FALLBACK_MAX_SUBSTEPS: usize = 1000;
