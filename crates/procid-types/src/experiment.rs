//! Step-response experiment records and sampled traces.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::FopdtParams;

/// Structural problems found in an experiment record
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExperimentError {
    #[error("Experiment has no samples")]
    Empty,

    #[error("Series '{name}' has {len} samples, expected {expected}")]
    LengthMismatch {
        name: &'static str,
        len: usize,
        expected: usize,
    },

    #[error("Time samples must be strictly increasing (index {0})")]
    NonIncreasingTime(usize),

    #[error("Series '{name}' contains a non-finite value at index {index}")]
    NonFinite { name: &'static str, index: usize },
}

/// One recorded open-loop step-response experiment
///
/// `time`, `output` and (when present) `input` are parallel series. The
/// legacy dataset names `tiempo`, `salida` and `entrada` are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepExperiment {
    #[serde(alias = "tiempo")]
    pub time: Vec<f64>,
    #[serde(alias = "salida")]
    pub output: Vec<f64>,
    #[serde(default, alias = "entrada")]
    pub input: Option<Vec<f64>>,
    /// Step amplitude applied at the input
    #[serde(default)]
    pub amplitude: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    /// Known plant parameters for synthesized datasets
    #[serde(default)]
    pub reference: Option<FopdtParams>,
}

impl StepExperiment {
    /// Create an experiment from time and output only
    pub fn new(time: Vec<f64>, output: Vec<f64>) -> Self {
        Self {
            time,
            output,
            input: None,
            amplitude: None,
            description: None,
            reference: None,
        }
    }

    pub fn with_input(mut self, input: Vec<f64>) -> Self {
        self.input = Some(input);
        self
    }

    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = Some(amplitude);
        self
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Step amplitude: the explicit value, else the mean of the input
    /// samples, else 1.0
    pub fn amplitude(&self) -> f64 {
        if let Some(a) = self.amplitude {
            return a;
        }
        match &self.input {
            Some(u) if !u.is_empty() => u.iter().sum::<f64>() / u.len() as f64,
            _ => 1.0,
        }
    }

    /// Check lengths, ordering and finiteness of every series
    pub fn validate(&self) -> Result<(), ExperimentError> {
        if self.time.is_empty() || self.output.is_empty() {
            return Err(ExperimentError::Empty);
        }
        let n = self.time.len();
        if self.output.len() != n {
            return Err(ExperimentError::LengthMismatch {
                name: "output",
                len: self.output.len(),
                expected: n,
            });
        }
        if let Some(u) = &self.input {
            if u.len() != n {
                return Err(ExperimentError::LengthMismatch {
                    name: "input",
                    len: u.len(),
                    expected: n,
                });
            }
            check_finite("input", u)?;
        }
        check_finite("time", &self.time)?;
        check_finite("output", &self.output)?;
        if let Some(i) = self.time.windows(2).position(|w| w[1] <= w[0]) {
            return Err(ExperimentError::NonIncreasingTime(i + 1));
        }
        Ok(())
    }
}

fn check_finite(name: &'static str, values: &[f64]) -> Result<(), ExperimentError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(ExperimentError::NonFinite { name, index }),
        None => Ok(()),
    }
}

/// A sampled signal: parallel time and value series
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Trace {
    pub time: Vec<f64>,
    pub values: Vec<f64>,
}

impl Trace {
    pub fn new(time: Vec<f64>, values: Vec<f64>) -> Self {
        Self { time, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amplitude_resolution_order() {
        let exp = StepExperiment::new(vec![0.0, 1.0], vec![0.0, 1.0]);
        assert_eq!(exp.amplitude(), 1.0);

        let exp = exp.with_input(vec![2.0, 4.0]);
        assert_eq!(exp.amplitude(), 3.0);

        let exp = exp.with_amplitude(60.0);
        assert_eq!(exp.amplitude(), 60.0);
    }

    #[test]
    fn test_validate_rejects_empty() {
        let exp = StepExperiment::new(vec![], vec![]);
        assert_eq!(exp.validate(), Err(ExperimentError::Empty));
    }

    #[test]
    fn test_validate_rejects_mismatched_input() {
        let exp = StepExperiment::new(vec![0.0, 1.0], vec![0.0, 1.0]).with_input(vec![1.0]);
        assert!(matches!(
            exp.validate(),
            Err(ExperimentError::LengthMismatch { name: "input", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_repeated_time() {
        let exp = StepExperiment::new(vec![0.0, 1.0, 1.0], vec![0.0, 1.0, 2.0]);
        assert_eq!(exp.validate(), Err(ExperimentError::NonIncreasingTime(2)));
    }

    #[test]
    fn test_deserialize_minimal_record() {
        let json = r#"{ "time": [0.0, 0.5, 1.0], "output": [0.0, 0.2, 0.4] }"#;
        let exp: StepExperiment = serde_json::from_str(json).unwrap();
        assert_eq!(exp.len(), 3);
        assert!(exp.input.is_none());
        assert!(exp.reference.is_none());
        assert!(exp.validate().is_ok());
    }

    #[test]
    fn test_deserialize_legacy_names() {
        let json = r#"{ "tiempo": [0.0, 1.0], "salida": [0.0, 2.0], "entrada": [1.0, 1.0] }"#;
        let exp: StepExperiment = serde_json::from_str(json).unwrap();
        assert_eq!(exp.output, vec![0.0, 2.0]);
        assert_eq!(exp.amplitude(), 1.0);
    }

    #[test]
    fn test_unknown_metadata_is_ignored() {
        let json = r#"{ "time": [0.0, 1.0], "output": [0.0, 1.0], "config": { "dt": 1.0 } }"#;
        let exp: StepExperiment = serde_json::from_str(json).unwrap();
        assert_eq!(exp.len(), 2);
    }
}
