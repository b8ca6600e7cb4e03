//! Classical fourth-order Runge-Kutta

use nalgebra::DVector;

use super::{ExplicitSolver, Solver, SolverError};

/// Classical RK4 with a fixed step
///
/// Four stages, not A-stable: the caller sizes `dt` against the fastest pole
/// (see `StateSpace::pole_bound`).
#[derive(Debug, Clone)]
pub struct RK4 {
    x: DVector<f64>,
}

impl RK4 {
    pub fn new(x0: DVector<f64>) -> Self {
        Self { x: x0 }
    }
}

impl Solver for RK4 {
    fn state(&self) -> &DVector<f64> {
        &self.x
    }
}

impl ExplicitSolver for RK4 {
    fn step<F>(&mut self, mut f: F, t: f64, dt: f64) -> Result<(), SolverError>
    where
        F: FnMut(&DVector<f64>, f64) -> DVector<f64>,
    {
        let h2 = 0.5 * dt;
        let k1 = f(&self.x, t);
        let k2 = f(&(&self.x + &k1 * h2), t + h2);
        let k3 = f(&(&self.x + &k2 * h2), t + h2);
        let k4 = f(&(&self.x + &k3 * dt), t + dt);
        self.x += (k1 + (k2 + k3) * 2.0 + k4) * (dt / 6.0);

        if self.x.iter().all(|v| v.is_finite()) {
            Ok(())
        } else {
            Err(SolverError::NonFiniteState { t })
        }
    }
}
