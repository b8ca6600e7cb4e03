//! Fixed-step integration of state-space models

pub mod base;
pub mod rk4;

pub use base::{ExplicitSolver, Solver, SolverError};
pub use rk4::RK4;
