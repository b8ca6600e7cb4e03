//! Identification, simulation and tuning settings.

use serde::{Deserialize, Serialize};

/// Default Savitzky-Golay window length (samples)
pub const DEFAULT_SMOOTHING_WINDOW: usize = 11;

/// Default Savitzky-Golay polynomial order
pub const DEFAULT_SMOOTHING_POLYORDER: usize = 3;

/// Default order of the Padé dead-time approximation
pub const DEFAULT_PADE_ORDER: usize = 10;

/// How a continuous model is advanced between grid samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Discretization {
    /// Exact matrix exponential with the input linear between samples
    #[default]
    FirstOrderHold,
    /// Classical RK4 with automatic sub-stepping
    Rk4,
}

impl Discretization {
    pub fn as_str(&self) -> &'static str {
        match self {
            Discretization::FirstOrderHold => "FOH",
            Discretization::Rk4 => "RK4",
        }
    }
}

/// Two-point graphical identification variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TwoPointMethod {
    /// Smith: 28.3% / 63.2% levels
    #[default]
    Smith,
    /// Sundaresan-Krishnaswamy: 35.3% / 85.3% levels
    Sundaresan,
}

impl TwoPointMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            TwoPointMethod::Smith => "Smith",
            TwoPointMethod::Sundaresan => "Sundaresan",
        }
    }
}

/// Closed-form PID tuning rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TuningRule {
    /// Chien-Hrones-Reswick, setpoint response without overshoot
    #[default]
    Chr,
    /// Chien-Hrones-Reswick, setpoint response with 20% overshoot
    ChrWithOvershoot,
    /// Integral of time-weighted absolute error, setpoint tracking
    Itae,
}

impl TuningRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            TuningRule::Chr => "CHR",
            TuningRule::ChrWithOvershoot => "CHR-20%",
            TuningRule::Itae => "ITAE",
        }
    }
}

/// Savitzky-Golay smoothing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmoothingSettings {
    /// Requested window length; adjusted to an odd value that fits the trace
    pub window: usize,
    /// Polynomial order fitted inside each window
    pub polyorder: usize,
}

impl Default for SmoothingSettings {
    fn default() -> Self {
        Self {
            window: DEFAULT_SMOOTHING_WINDOW,
            polyorder: DEFAULT_SMOOTHING_POLYORDER,
        }
    }
}

/// Settings for model simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Padé order for the dead-time term; 0 disables the approximation
    pub pade_order: usize,
    pub discretization: Discretization,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            pade_order: DEFAULT_PADE_ORDER,
            discretization: Discretization::FirstOrderHold,
        }
    }
}

/// Settings for a two-point identification run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentificationSettings {
    pub method: TwoPointMethod,
    /// `None` disables smoothing
    pub smoothing: Option<SmoothingSettings>,
    pub simulation: SimulationSettings,
}

impl Default for IdentificationSettings {
    fn default() -> Self {
        Self {
            method: TwoPointMethod::Smith,
            smoothing: Some(SmoothingSettings::default()),
            simulation: SimulationSettings::default(),
        }
    }
}

impl IdentificationSettings {
    /// Same settings with smoothing disabled
    pub fn without_smoothing(mut self) -> Self {
        self.smoothing = None;
        self
    }
}
