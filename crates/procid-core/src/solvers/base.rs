//! Solver traits and error kinds shared by the discretizations

use nalgebra::DVector;
use thiserror::Error;

/// Failures while advancing a linear system along a time grid
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Time grid is not strictly increasing at index {index} (dt = {dt})")]
    NonIncreasingTime { index: usize, dt: f64 },

    #[error("Interval needs {required} RK4 sub-steps, limit is {limit}")]
    SubstepLimit { required: usize, limit: usize },

    #[error("Discretization for dt = {dt} produced non-finite matrices")]
    NonFiniteDiscretization { dt: f64 },

    #[error("State became non-finite while integrating from t = {t}")]
    NonFiniteState { t: f64 },

    #[error("Non-finite output at sample {index}")]
    NonFiniteOutput { index: usize },
}

/// An integrator owning the state vector of `dx/dt = f(x, t)`
pub trait Solver {
    fn state(&self) -> &DVector<f64>;
}

/// Integrators that only evaluate `f`, never solve for the new state
pub trait ExplicitSolver: Solver {
    /// Advance from `t` to `t + dt`; fails when the new state is not finite
    fn step<F>(&mut self, f: F, t: f64, dt: f64) -> Result<(), SolverError>
    where
        F: FnMut(&DVector<f64>, f64) -> DVector<f64>;
}
