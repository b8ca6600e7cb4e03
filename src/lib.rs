//! procid - FOPDT process identification, PID tuning and closed-loop preview
//!
//! Re-exports the identification core and the shared record types, and adds
//! the [`pipeline`] that chains them for one experiment.
//!
//! # Example
//!
//! ```rust,ignore
//! use procid::prelude::*;
//!
//! let experiment = load_experiment("step.json")?;
//! let report = procid::pipeline::run(
//!     &experiment,
//!     IdentificationSettings::default(),
//!     TuningRule::Chr,
//!     1.0,
//! )?;
//! println!("{}", report);
//! ```

pub mod pipeline;

pub use procid_core::*;
pub use procid_types;

pub use pipeline::{GainSource, PipelineError, Report};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::pipeline::{run, run_with_gains, GainSource, PipelineError, Report};
    pub use procid_core::prelude::*;
}
