//! procid-core - FOPDT process identification and control-loop simulation
//!
//! Identifies first-order-plus-dead-time models from open-loop step
//! responses with the Smith two-point method, tunes PID controllers with
//! closed-form rules, and simulates the open and closed loops through
//! Padé-approximated transfer functions.
//!
//! # Example
//!
//! ```rust,ignore
//! use procid_core::prelude::*;
//!
//! let experiment = load_experiment("step.json")?;
//! let result = SmithIdentifier::default().identify_experiment(&experiment)?;
//! let gains = TuningRule::Chr.apply(&result.params.params())?;
//! let response = simulate_closed_loop(
//!     result.params.k, result.params.tau, result.params.theta,
//!     &gains, &experiment.time, None, 1.0,
//! )?;
//! let metrics = compute_metrics(response.time(), response.output(), Some(1.0));
//! ```

pub mod block;
pub mod blocks;
pub mod identification;
pub mod io;
pub mod lti;
pub mod metrics;
pub mod plant;
pub mod smoothing;
pub mod solvers;
pub mod tuning;
pub mod utils;

pub use procid_types;

pub use identification::{identify, Identification, IdentificationError, SmithIdentifier};
pub use io::{load_experiment, load_settings, parse_experiment, save_traces_csv, write_traces_csv};
pub use metrics::{compute_metrics, mean_squared_error, StepMetrics};
pub use plant::{
    simulate_closed_loop, simulate_open_loop, PlantModel, Simulation, SimulationError,
    SimulationQuality,
};
pub use tuning::{chr, chr_with_overshoot, itae, Tune, TuningError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::identification::{identify, Identification, IdentificationError, SmithIdentifier};
    pub use crate::io::{load_experiment, load_settings, save_traces_csv};
    pub use crate::metrics::{compute_metrics, StepMetrics};
    pub use crate::plant::{simulate_closed_loop, simulate_open_loop, PlantModel, Simulation};
    pub use crate::tuning::{chr, chr_with_overshoot, itae, Tune};
    pub use procid_types::*;
}
