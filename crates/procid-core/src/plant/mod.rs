//! FOPDT plant model and its open- and closed-loop simulation
//!
//! The plant `K/(tau*s + 1)` is put in series with a Padé approximation of
//! `exp(-theta*s)` and, for closed-loop runs, with the ideal PID
//! `C(s) = (Kp*Td*s^2 + Kp*s + Kp/Ti)/s` under unity feedback. The
//! composed transfer function is realized and simulated on the caller's
//! grid. Solver failures do not propagate: the block simulator in
//! [`fallback`] produces the trace instead and the result is tagged
//! [`SimulationQuality::Degraded`].

mod fallback;

use log::{debug, warn};
use procid_types::{FopdtParams, ParamError, PidGains, SimulationSettings, Trace};
use thiserror::Error;

use crate::lti::{pade, LtiError, TransferFunction};
use crate::solvers::SolverError;
use crate::utils::resample_by_index;

/// Errors from simulation requests.
///
/// Invalid plant, controller, grid or input values are returned to the
/// caller. Realization and solver errors only appear inside
/// [`SimulationQuality::Degraded`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Invalid plant parameter '{name}' = {value}")]
    InvalidPlant { name: &'static str, value: f64 },

    #[error("Invalid controller gains: {0}")]
    InvalidController(#[from] ParamError),

    #[error("Time grid is not strictly increasing at index {0}")]
    InvalidGrid(usize),

    #[error("Input signal is empty")]
    EmptyInput,

    #[error("Input signal is not finite at index {0}")]
    NonFiniteInput(usize),

    #[error("Realization failed: {0}")]
    Realization(#[from] LtiError),

    #[error("Solver failed: {0}")]
    Solver(#[from] SolverError),
}

/// How a simulated trace was produced
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SimulationQuality {
    /// Transfer-function path with the Padé dead-time approximation
    #[default]
    Nominal,
    /// Block fallback, with the error that forced it
    Degraded(SimulationError),
}

impl SimulationQuality {
    pub fn is_degraded(&self) -> bool {
        matches!(self, SimulationQuality::Degraded(_))
    }
}

/// A simulated response on the requested grid
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub trace: Trace,
    pub quality: SimulationQuality,
    /// The input had a different length than the grid and was resampled
    pub resampled_input: bool,
}

impl Simulation {
    pub fn time(&self) -> &[f64] {
        &self.trace.time
    }

    pub fn output(&self) -> &[f64] {
        &self.trace.values
    }

    pub fn is_degraded(&self) -> bool {
        self.quality.is_degraded()
    }
}

/// First-order-plus-dead-time plant with its simulation settings
#[derive(Debug, Clone, PartialEq)]
pub struct PlantModel {
    params: FopdtParams,
    settings: SimulationSettings,
}

impl PlantModel {
    /// Create a model; `k` must be finite, `tau > 0` and `theta >= 0`.
    pub fn new(params: FopdtParams, settings: SimulationSettings) -> Result<Self, SimulationError> {
        let FopdtParams { k, tau, theta } = params;
        if !k.is_finite() {
            return Err(SimulationError::InvalidPlant { name: "k", value: k });
        }
        if !tau.is_finite() || tau <= 0.0 {
            return Err(SimulationError::InvalidPlant { name: "tau", value: tau });
        }
        if !theta.is_finite() || theta < 0.0 {
            return Err(SimulationError::InvalidPlant {
                name: "theta",
                value: theta,
            });
        }
        Ok(Self { params, settings })
    }

    /// Model with default simulation settings
    pub fn from_parts(k: f64, tau: f64, theta: f64) -> Result<Self, SimulationError> {
        Self::new(FopdtParams::new(k, tau, theta), SimulationSettings::default())
    }

    pub fn params(&self) -> FopdtParams {
        self.params
    }

    /// `K/(tau*s + 1)` in series with the Padé approximation of the dead
    /// time; the plant alone when `theta == 0` or the Padé order is 0.
    pub fn build_plant_with_delay(&self) -> Result<TransferFunction, LtiError> {
        let plant = TransferFunction::first_order(self.params.k, self.params.tau)?;
        if self.params.theta == 0.0 || self.settings.pade_order == 0 {
            return Ok(plant);
        }
        plant.series(&pade(self.params.theta, self.settings.pade_order)?)
    }

    /// Closed loop `C*G / (1 + C*G)` with the ideal PID
    pub fn build_closed_loop(&self, gains: &PidGains) -> Result<TransferFunction, LtiError> {
        let PidGains { kp, ti, td } = *gains;
        let controller = TransferFunction::new(vec![kp * td, kp, kp / ti], vec![1.0, 0.0])?;
        controller.series(&self.build_plant_with_delay()?)?.feedback()
    }

    /// Response to a unit step applied at `t = 0`, scaled by `K` through
    /// the plant, sampled at `time`
    pub fn simulate_open_loop_step(&self, time: &[f64]) -> Result<Simulation, SimulationError> {
        check_grid(time)?;
        let input = vec![1.0; time.len()];
        Ok(self.run(None, time, &input, true, false))
    }

    /// Response to an arbitrary input from rest at `time[0]`.
    ///
    /// An input of different length is resampled onto the grid over a
    /// normalized index space and the result is flagged.
    pub fn simulate_forced_response(
        &self,
        time: &[f64],
        input: &[f64],
    ) -> Result<Simulation, SimulationError> {
        check_grid(time)?;
        let (input, resampled) = fit_input(time, input)?;
        Ok(self.run(None, time, &input, false, resampled))
    }

    /// PID in series with the delayed plant under unity feedback.
    ///
    /// Without `input` the reference is a constant `step_amplitude` applied
    /// at `t = 0`; otherwise `input` is the reference signal.
    pub fn simulate_closed_loop_step(
        &self,
        gains: &PidGains,
        time: &[f64],
        input: Option<&[f64]>,
        step_amplitude: f64,
    ) -> Result<Simulation, SimulationError> {
        gains.validate()?;
        check_grid(time)?;
        match input {
            Some(signal) => {
                let (reference, resampled) = fit_input(time, signal)?;
                Ok(self.run(Some(gains), time, &reference, false, resampled))
            }
            None => {
                if !step_amplitude.is_finite() {
                    return Err(SimulationError::NonFiniteInput(0));
                }
                let reference = vec![step_amplitude; time.len()];
                Ok(self.run(Some(gains), time, &reference, true, false))
            }
        }
    }

    /// Simulate through the transfer-function path, falling back to the
    /// block simulator on failure. With `step_at_origin` and a grid that
    /// starts after 0, the system is first advanced from rest at `t = 0`.
    fn run(
        &self,
        gains: Option<&PidGains>,
        time: &[f64],
        input: &[f64],
        step_at_origin: bool,
        resampled_input: bool,
    ) -> Simulation {
        if time.is_empty() {
            return Simulation {
                trace: Trace::default(),
                quality: SimulationQuality::Nominal,
                resampled_input,
            };
        }

        let prepend = step_at_origin && time[0] > 0.0;
        let (sim_time, sim_input) = if prepend {
            let mut t = Vec::with_capacity(time.len() + 1);
            t.push(0.0);
            t.extend_from_slice(time);
            let mut u = Vec::with_capacity(input.len() + 1);
            u.push(input[0]);
            u.extend_from_slice(input);
            (t, u)
        } else {
            (time.to_vec(), input.to_vec())
        };

        let (mut values, quality) = match self.simulate_nominal(gains, &sim_time, &sim_input) {
            Ok(values) => (values, SimulationQuality::Nominal),
            Err(err) => {
                warn!(
                    "Simulation of {:?} fell back to block simulator: {}",
                    self.params, err
                );
                let values = fallback::simulate(&self.params, gains, &sim_time, &sim_input);
                (values, SimulationQuality::Degraded(err))
            }
        };
        if prepend {
            values.remove(0);
        }

        Simulation {
            trace: Trace::new(time.to_vec(), values),
            quality,
            resampled_input,
        }
    }

    fn simulate_nominal(
        &self,
        gains: Option<&PidGains>,
        time: &[f64],
        input: &[f64],
    ) -> Result<Vec<f64>, SimulationError> {
        let tf = match gains {
            Some(gains) => self.build_closed_loop(gains)?,
            None => self.build_plant_with_delay()?,
        };
        let ss = tf.to_state_space()?;
        debug!(
            "Simulating order {} model ({}) over {} samples",
            tf.order(),
            self.settings.discretization.as_str(),
            time.len()
        );
        Ok(ss.simulate(time, input, self.settings.discretization)?)
    }
}

fn check_grid(time: &[f64]) -> Result<(), SimulationError> {
    if let Some(i) = time.iter().position(|t| !t.is_finite()) {
        return Err(SimulationError::InvalidGrid(i));
    }
    match time.windows(2).position(|w| w[1] <= w[0]) {
        Some(i) => Err(SimulationError::InvalidGrid(i + 1)),
        None => Ok(()),
    }
}

/// Match the input length to the grid, resampling when they differ
fn fit_input(time: &[f64], input: &[f64]) -> Result<(Vec<f64>, bool), SimulationError> {
    if input.is_empty() {
        return if time.is_empty() {
            Ok((Vec::new(), false))
        } else {
            Err(SimulationError::EmptyInput)
        };
    }
    if let Some(i) = input.iter().position(|u| !u.is_finite()) {
        return Err(SimulationError::NonFiniteInput(i));
    }
    if input.len() == time.len() {
        return Ok((input.to_vec(), false));
    }
    warn!(
        "Input has {} samples for a grid of {}; resampling by index",
        input.len(),
        time.len()
    );
    Ok((resample_by_index(input, time.len()), true))
}

/// Open-loop step response of `K*exp(-theta*s)/(tau*s + 1)` with default
/// settings
pub fn simulate_open_loop(
    k: f64,
    tau: f64,
    theta: f64,
    time: &[f64],
) -> Result<Simulation, SimulationError> {
    PlantModel::from_parts(k, tau, theta)?.simulate_open_loop_step(time)
}

/// Closed-loop response under an ideal PID with default settings
pub fn simulate_closed_loop(
    k: f64,
    tau: f64,
    theta: f64,
    gains: &PidGains,
    time: &[f64],
    input: Option<&[f64]>,
    amplitude: f64,
) -> Result<Simulation, SimulationError> {
    PlantModel::from_parts(k, tau, theta)?.simulate_closed_loop_step(gains, time, input, amplitude)
}
