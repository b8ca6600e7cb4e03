//! Identify, tune and preview the closed loop for one experiment

use std::fmt;

use log::info;
use procid_core::identification::{Identification, IdentificationError, SmithIdentifier};
use procid_core::metrics::{compute_metrics, StepMetrics};
use procid_core::plant::{PlantModel, Simulation, SimulationError};
use procid_core::tuning::{Tune, TuningError};
use procid_types::{
    FopdtParams, IdentificationSettings, ParamError, PidGains, StepExperiment, TuningRule,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Identification failed: {0}")]
    Identification(#[from] IdentificationError),

    #[error("Tuning failed: {0}")]
    Tuning(#[from] TuningError),

    #[error("Invalid controller gains: {0}")]
    InvalidGains(#[from] ParamError),

    #[error("Closed-loop simulation failed: {0}")]
    Simulation(#[from] SimulationError),
}

/// Where the controller gains of a [`Report`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GainSource {
    Rule(TuningRule),
    /// Typed in by the user
    Manual,
}

impl GainSource {
    pub fn label(&self) -> &'static str {
        match self {
            GainSource::Rule(rule) => rule.as_str(),
            GainSource::Manual => "Manual",
        }
    }
}

/// Everything produced for one experiment
#[derive(Debug, Clone)]
pub struct Report {
    pub identification: Identification,
    pub source: GainSource,
    pub gains: PidGains,
    pub setpoint: f64,
    pub closed_loop: Simulation,
    pub metrics: StepMetrics,
    /// Relative `(K, tau, theta)` errors against the dataset's reference
    pub reference_error: Option<(f64, f64, f64)>,
}

/// Identify the plant, tune it with `rule` and simulate a setpoint step
pub fn run(
    experiment: &StepExperiment,
    settings: IdentificationSettings,
    rule: TuningRule,
    setpoint: f64,
) -> Result<Report, PipelineError> {
    let identification = identify(experiment, settings)?;
    let gains = rule.apply(&identification.params.params())?;
    info!("{} gains: {:?}", rule.as_str(), gains);
    preview(experiment, settings, identification, GainSource::Rule(rule), gains, setpoint)
}

/// Identify the plant and simulate a setpoint step under hand-picked gains
pub fn run_with_gains(
    experiment: &StepExperiment,
    settings: IdentificationSettings,
    gains: PidGains,
    setpoint: f64,
) -> Result<Report, PipelineError> {
    let gains = PidGains::new(gains.kp, gains.ti, gains.td)?;
    let identification = identify(experiment, settings)?;
    info!("Manual gains: {:?}", gains);
    preview(experiment, settings, identification, GainSource::Manual, gains, setpoint)
}

fn identify(
    experiment: &StepExperiment,
    settings: IdentificationSettings,
) -> Result<Identification, PipelineError> {
    let identification = SmithIdentifier::new(settings).identify_experiment(experiment)?;
    let p = &identification.params;
    info!(
        "Identified K={:.4} tau={:.4} theta={:.4} (eqm {:.3e})",
        p.k, p.tau, p.theta, p.eqm
    );
    Ok(identification)
}

fn preview(
    experiment: &StepExperiment,
    settings: IdentificationSettings,
    identification: Identification,
    source: GainSource,
    gains: PidGains,
    setpoint: f64,
) -> Result<Report, PipelineError> {
    let params = identification.params.params();
    let closed_loop = PlantModel::new(params, settings.simulation)?.simulate_closed_loop_step(
        &gains,
        &experiment.time,
        None,
        setpoint,
    )?;
    let metrics = compute_metrics(closed_loop.time(), closed_loop.output(), Some(setpoint));
    let reference_error = experiment
        .reference
        .as_ref()
        .map(|reference: &FopdtParams| params.relative_error(reference));

    Ok(Report {
        identification,
        source,
        gains,
        setpoint,
        closed_loop,
        metrics,
        reference_error,
    })
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.4}", v))
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.identification.params;
        let d = &self.identification.diagnostics;
        writeln!(f, "Identified model ({})", d.method.as_str())?;
        writeln!(f, "  K     = {:.4}", p.k)?;
        writeln!(f, "  tau   = {:.4} s", p.tau)?;
        writeln!(f, "  theta = {:.4} s", p.theta)?;
        writeln!(f, "  eqm   = {:.4e}", p.eqm)?;
        if d.tau_clamped || d.theta_clamped {
            writeln!(f, "  (parameters clamped to their floors)")?;
        }
        if d.simulation.is_degraded() {
            writeln!(f, "  (validation used the fallback simulator)")?;
        }
        if let Some((ek, etau, etheta)) = self.reference_error {
            writeln!(
                f,
                "  error vs reference: K {:.2}%, tau {:.2}%, theta {:.2}%",
                100.0 * ek,
                100.0 * etau,
                100.0 * etheta
            )?;
        }

        writeln!(f, "\n{} PID gains", self.source.label())?;
        writeln!(f, "  Kp = {:.4}", self.gains.kp)?;
        writeln!(f, "  Ti = {:.4} s", self.gains.ti)?;
        writeln!(f, "  Td = {:.4} s", self.gains.td)?;

        writeln!(f, "\nClosed-loop step to {}", self.setpoint)?;
        if self.closed_loop.is_degraded() {
            writeln!(f, "  (simulated with the fallback simulator)")?;
        }
        writeln!(f, "  rise time          = {}", fmt_opt(self.metrics.rise_time))?;
        writeln!(f, "  overshoot          = {}", fmt_opt(self.metrics.overshoot))?;
        writeln!(f, "  settling time      = {}", fmt_opt(self.metrics.settling_time))?;
        write!(f, "  steady-state error = {}", fmt_opt(self.metrics.steady_state_error))
    }
}
