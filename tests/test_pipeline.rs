//! End-to-end: experiment record -> identification -> tuning -> closed loop

use std::io::Write;

use approx::assert_relative_eq;
use procid::pipeline::{run, run_with_gains, GainSource, PipelineError};
use procid::prelude::*;
use procid::TuningError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

fn synthetic_experiment(noise: f64, seed: u64) -> StepExperiment {
    let time: Vec<f64> = (0..1001).map(|i| i as f64 * 0.1).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, noise).unwrap();
    let output = time
        .iter()
        .map(|&t| {
            let y = if t > 3.0 { 2.0 * (1.0 - (-(t - 3.0) / 10.0).exp()) } else { 0.0 };
            y + normal.sample(&mut rng)
        })
        .collect();
    let mut experiment = StepExperiment::new(time, output).with_input(vec![1.0; 1001]);
    experiment.reference = Some(FopdtParams::new(2.0, 10.0, 3.0));
    experiment
}

#[test]
fn test_pipeline_on_clean_data() {
    let experiment = synthetic_experiment(1e-9, 0);
    let report = run(&experiment, IdentificationSettings::default(), TuningRule::Chr, 1.0).unwrap();

    let (ek, etau, etheta) = report.reference_error.unwrap();
    assert!(ek < 0.05 && etau < 0.05 && etheta < 0.05);
    assert_eq!(report.closed_loop.output().len(), experiment.len());
    assert!(report.metrics.overshoot.unwrap().is_finite());
    assert!(report.metrics.steady_state_error.unwrap().abs() < 0.02);

    assert_eq!(report.source, GainSource::Rule(TuningRule::Chr));
    let text = report.to_string();
    assert!(text.contains("CHR PID gains"));
    assert!(text.contains("settling time"));
}

#[test]
fn test_pipeline_on_noisy_data() {
    let experiment = synthetic_experiment(0.01, 11);
    let report = run(&experiment, IdentificationSettings::default(), TuningRule::Itae, 2.0).unwrap();

    assert_relative_eq!(report.identification.params.k, 2.0, max_relative = 0.05);
    let tail = &report.closed_loop.output()[950..];
    assert!(tail.iter().all(|y| (y - 2.0).abs() < 0.05));
}

#[test]
fn test_pipeline_reports_tuning_errors() {
    // A flat record identifies K = 0, outside every rule's domain
    let time: Vec<f64> = (0..50).map(|i| i as f64).collect();
    let experiment = StepExperiment::new(time, vec![1.0; 50]);
    let settings = IdentificationSettings::default().without_smoothing();

    let result = run(&experiment, settings, TuningRule::Chr, 1.0);

    assert!(matches!(
        result,
        Err(PipelineError::Tuning(TuningError::Domain { name: "k", .. }))
    ));
}

#[test]
fn test_pipeline_from_file() {
    let experiment = synthetic_experiment(1e-9, 3);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string(&experiment).unwrap().as_bytes()).unwrap();

    let loaded = load_experiment(file.path()).unwrap();
    assert_eq!(loaded, experiment);

    let report = run(&loaded, IdentificationSettings::default(), TuningRule::ChrWithOvershoot, 1.0).unwrap();
    assert!(report.gains.kp > 0.0);
}

#[test]
fn test_pipeline_with_manual_gains() {
    let experiment = synthetic_experiment(1e-9, 5);
    let gains = PidGains::new(1.0, 10.0, 0.0).unwrap();

    let report = run_with_gains(&experiment, IdentificationSettings::default(), gains, 1.0).unwrap();

    assert_eq!(report.source, GainSource::Manual);
    assert_eq!(report.gains, gains);
    assert!(report.metrics.rise_time.is_some());
    let tail = &report.closed_loop.output()[950..];
    assert!(tail.iter().all(|y| (y - 1.0).abs() < 0.05));
    assert!(report.to_string().contains("Manual PID gains"));
}

#[test]
fn test_pipeline_rejects_invalid_manual_gains() {
    let experiment = synthetic_experiment(1e-9, 5);
    let gains = PidGains { kp: 1.0, ti: 0.0, td: 0.0 };

    let result = run_with_gains(&experiment, IdentificationSettings::default(), gains, 1.0);

    assert!(matches!(
        result,
        Err(PipelineError::InvalidGains(ParamError::NonPositiveIntegralTime(_)))
    ));
}
