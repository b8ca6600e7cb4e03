//! Continuous state-space models and their simulation on a sample grid
//!
//!   dx/dt = A x + B u
//!   y     = C x + D u
//!
//! The input is taken as linear between grid samples. Two integrators are
//! available: the exact first-order-hold discretization (matrix exponential
//! of the augmented system) and sub-stepped RK4.

use log::debug;
use nalgebra::{DMatrix, DVector};
use procid_types::Discretization;

use super::expm::expm;
use crate::solvers::{ExplicitSolver, Solver, SolverError, RK4};
use crate::utils::constants::{DT_REUSE_TOLERANCE, RK4_MAX_SUBSTEPS, RK4_STABILITY_TARGET};

/// SISO state-space model
#[derive(Debug, Clone, PartialEq)]
pub struct StateSpace {
    a: DMatrix<f64>,
    b: DVector<f64>,
    c: DVector<f64>,
    d: f64,
    /// Upper bound on the magnitude of the eigenvalues of `a`
    pole_bound: f64,
}

/// Discrete update for one interval length under first-order hold:
/// `x_{k+1} = ad x_k + bd0 u_k + bd1 u_{k+1}`
#[derive(Debug, Clone)]
pub struct FohStep {
    pub ad: DMatrix<f64>,
    pub bd0: DVector<f64>,
    pub bd1: DVector<f64>,
}

impl StateSpace {
    pub fn new(a: DMatrix<f64>, b: DVector<f64>, c: DVector<f64>, d: f64, pole_bound: f64) -> Self {
        Self {
            a,
            b,
            c,
            d,
            pole_bound,
        }
    }

    pub fn states(&self) -> usize {
        self.b.len()
    }

    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    pub fn b(&self) -> &DVector<f64> {
        &self.b
    }

    pub fn c(&self) -> &DVector<f64> {
        &self.c
    }

    pub fn d(&self) -> f64 {
        self.d
    }

    pub fn pole_bound(&self) -> f64 {
        self.pole_bound
    }

    /// Exact discretization for inputs linear over an interval of length `dt`.
    ///
    /// Uses `exp(M)` with `M = [[A dt, B dt, 0], [0, 0, 1], [0, 0, 0]]`;
    /// `ad = E[:n, :n]`, `bd1 = E[:n, n+1]`, `bd0 = E[:n, n] - bd1`.
    pub fn foh(&self, dt: f64) -> Result<FohStep, SolverError> {
        let n = self.states();
        let mut m = DMatrix::zeros(n + 2, n + 2);
        for i in 0..n {
            for j in 0..n {
                m[(i, j)] = self.a[(i, j)] * dt;
            }
            m[(i, n)] = self.b[i] * dt;
        }
        m[(n, n + 1)] = 1.0;

        let e = expm(&m).ok_or(SolverError::NonFiniteDiscretization { dt })?;
        let ad = DMatrix::from_fn(n, n, |i, j| e[(i, j)]);
        let bd1 = DVector::from_fn(n, |i, _| e[(i, n + 1)]);
        let bd0 = DVector::from_fn(n, |i, _| e[(i, n)] - bd1[i]);
        Ok(FohStep { ad, bd0, bd1 })
    }

    fn output(&self, x: &DVector<f64>, u: f64) -> f64 {
        self.c.dot(x) + self.d * u
    }

    /// Simulate from a zero initial state, one output per grid sample.
    ///
    /// `time` and `input` must have the same length; `time` must be strictly
    /// increasing.
    pub fn simulate(
        &self,
        time: &[f64],
        input: &[f64],
        method: Discretization,
    ) -> Result<Vec<f64>, SolverError> {
        let len = time.len().min(input.len());
        if len == 0 {
            return Ok(Vec::new());
        }
        for k in 1..len {
            let dt = time[k] - time[k - 1];
            if !(dt > 0.0) {
                return Err(SolverError::NonIncreasingTime { index: k, dt });
            }
        }
        if self.states() == 0 {
            return Ok(input[..len].iter().map(|u| self.d * u).collect());
        }

        let outputs = match method {
            Discretization::FirstOrderHold => self.simulate_foh(&time[..len], &input[..len])?,
            Discretization::Rk4 => self.simulate_rk4(&time[..len], &input[..len])?,
        };
        match outputs.iter().position(|y| !y.is_finite()) {
            Some(index) => Err(SolverError::NonFiniteOutput { index }),
            None => Ok(outputs),
        }
    }

    fn simulate_foh(&self, time: &[f64], input: &[f64]) -> Result<Vec<f64>, SolverError> {
        let mut x = DVector::zeros(self.states());
        let mut outputs = Vec::with_capacity(time.len());
        outputs.push(self.output(&x, input[0]));

        let mut cached: Option<(f64, FohStep)> = None;
        let mut discretizations = 0usize;
        for k in 1..time.len() {
            let dt = time[k] - time[k - 1];
            let reuse = matches!(&cached, Some((h, _)) if (dt - h).abs() <= DT_REUSE_TOLERANCE * dt);
            if !reuse {
                cached = Some((dt, self.foh(dt)?));
                discretizations += 1;
            }
            if let Some((_, step)) = &cached {
                x = &step.ad * &x + &step.bd0 * input[k - 1] + &step.bd1 * input[k];
            }
            outputs.push(self.output(&x, input[k]));
        }
        debug!(
            "FOH simulation: {} states, {} samples, {} discretizations",
            self.states(),
            time.len(),
            discretizations
        );
        Ok(outputs)
    }

    fn simulate_rk4(&self, time: &[f64], input: &[f64]) -> Result<Vec<f64>, SolverError> {
        let mut solver = RK4::new(DVector::zeros(self.states()));
        let mut outputs = Vec::with_capacity(time.len());
        outputs.push(self.output(solver.state(), input[0]));

        for k in 1..time.len() {
            let (t0, dt) = (time[k - 1], time[k] - time[k - 1]);
            let required = (dt * self.pole_bound / RK4_STABILITY_TARGET).ceil().max(1.0);
            if !required.is_finite() || required > RK4_MAX_SUBSTEPS as f64 {
                return Err(SolverError::SubstepLimit {
                    required: required as usize,
                    limit: RK4_MAX_SUBSTEPS,
                });
            }
            let substeps = required as usize;
            let h = dt / substeps as f64;
            let (u0, slope) = (input[k - 1], (input[k] - input[k - 1]) / dt);
            for i in 0..substeps {
                let t = t0 + i as f64 * h;
                solver.step(|x, s| &self.a * x + &self.b * (u0 + slope * (s - t0)), t, h)?;
            }
            outputs.push(self.output(solver.state(), input[k]));
        }
        Ok(outputs)
    }
}
