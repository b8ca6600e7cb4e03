//! Two-point identifier

use log::{debug, warn};
use procid_types::{FopdtParams, IdentificationSettings, IdentifiedModel, StepExperiment, Trace};

use super::crossing::{find_crossing, Crossing};
use super::{
    method_levels, two_point_params, Identification, IdentificationDiagnostics, IdentificationError,
};
use crate::metrics::mean_squared_error;
use crate::plant::PlantModel;
use crate::smoothing::smooth;
use crate::utils::constants::TAU_FLOOR;
use crate::utils::resample;

/// Identifies FOPDT parameters with the Smith (or Sundaresan) two-point method
#[derive(Debug, Clone, Copy, Default)]
pub struct SmithIdentifier {
    settings: IdentificationSettings,
}

impl SmithIdentifier {
    pub fn new(settings: IdentificationSettings) -> Self {
        Self { settings }
    }

    /// Identify from a step of `amplitude` applied at `t = 0`
    pub fn identify(
        &self,
        time: &[f64],
        output: &[f64],
        amplitude: f64,
    ) -> Result<Identification, IdentificationError> {
        self.identify_with_input(time, output, amplitude, None)
    }

    /// Identify a recorded experiment, validating against its input signal
    /// when one was recorded
    pub fn identify_experiment(
        &self,
        experiment: &StepExperiment,
    ) -> Result<Identification, IdentificationError> {
        self.identify_with_input(
            &experiment.time,
            &experiment.output,
            experiment.amplitude(),
            experiment.input.as_deref(),
        )
    }

    /// Identify, simulating the forced response to `input` for validation
    /// when given, else the step response.
    pub fn identify_with_input(
        &self,
        time: &[f64],
        output: &[f64],
        amplitude: f64,
        input: Option<&[f64]>,
    ) -> Result<Identification, IdentificationError> {
        check_series(time, output)?;
        let n = output.len();
        let method = self.settings.method;

        let (smoothed, smoothing) = smooth(output, self.settings.smoothing);

        let y0 = smoothed[0];
        let yf = smoothed[n - 1];
        let delta = yf - y0;
        let (p1, p2) = method_levels(method);
        let levels = (y0 + p1 * delta, y0 + p2 * delta);

        let first = locate(time, &smoothed, levels.0);
        let second = locate(time, &smoothed, levels.1);
        let (t1, t2) = (first.time(), second.time());

        let (tau_raw, theta_raw) = two_point_params(method, t1, t2);
        let tau = tau_raw.max(TAU_FLOOR);
        let theta = theta_raw.max(0.0);
        let tau_clamped = tau_raw < TAU_FLOOR;
        let theta_clamped = theta_raw < 0.0;
        if tau_clamped {
            warn!("Identified tau {} raised to floor {}", tau_raw, TAU_FLOOR);
        }
        if theta_clamped {
            warn!("Identified theta {} raised to 0", theta_raw);
        }

        // Input change the gain is referred to; a unit step when unknown
        let step = if amplitude == 0.0 {
            1.0
        } else if !amplitude.is_finite() || !(delta / amplitude).is_finite() {
            warn!("Step amplitude {} unusable, gain taken as the raw output change", amplitude);
            1.0
        } else {
            amplitude
        };
        let k = delta / step;
        debug!(
            "{} crossings t1={:.4} t2={:.4} -> K={:.4} tau={:.4} theta={:.4}",
            method.as_str(),
            t1,
            t2,
            k,
            tau,
            theta
        );

        let model = PlantModel::new(FopdtParams::new(k, tau, theta), self.settings.simulation)?;
        let (simulation, scale) = match input {
            Some(u) if !u.is_empty() => {
                // Deviation from the rest level the step of `step` started from
                let rest = u[u.len() - 1] - step;
                let deviation: Vec<f64> = u.iter().map(|v| v - rest).collect();
                (model.simulate_forced_response(time, &deviation)?, 1.0)
            }
            _ => (model.simulate_open_loop_step(time)?, step),
        };
        let response: Vec<f64> = simulation.output().iter().map(|y| y0 + scale * y).collect();
        let y_hat = resample(simulation.time(), &response, time);

        let eqm = mean_squared_error(output, &y_hat).ok_or(IdentificationError::EmptySeries)?;

        Ok(Identification {
            params: IdentifiedModel { k, tau, theta, eqm },
            model: Trace::new(time.to_vec(), y_hat),
            diagnostics: IdentificationDiagnostics {
                method,
                smoothing,
                levels,
                first,
                second,
                tau_clamped,
                theta_clamped,
                simulation: simulation.quality,
            },
        })
    }
}

/// Identify with default settings (Smith method, smoothing on, Padé order 10)
pub fn identify(
    time: &[f64],
    output: &[f64],
    amplitude: f64,
) -> Result<Identification, IdentificationError> {
    SmithIdentifier::default().identify(time, output, amplitude)
}

fn check_series(time: &[f64], output: &[f64]) -> Result<(), IdentificationError> {
    if time.is_empty() || output.is_empty() {
        return Err(IdentificationError::EmptySeries);
    }
    if time.len() != output.len() {
        return Err(IdentificationError::LengthMismatch {
            time: time.len(),
            output: output.len(),
        });
    }
    for (name, series) in [("time", time), ("output", output)] {
        if let Some(index) = series.iter().position(|v| !v.is_finite()) {
            return Err(IdentificationError::NonFinite { name, index });
        }
    }
    Ok(())
}

fn locate(time: &[f64], values: &[f64], level: f64) -> Crossing {
    let crossing = find_crossing(time, values, level).unwrap_or(Crossing::Nearest(time[0]));
    if let Crossing::Nearest(t) = crossing {
        warn!("Level {} never crossed, using nearest sample at t={}", level, t);
    }
    crossing
}
