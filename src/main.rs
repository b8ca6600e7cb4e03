//! procid - identify a step-response experiment, tune a PID, preview the loop

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use procid::io::{load_experiment, load_settings, save_traces_csv, ExportError, LoadError};
use procid::pipeline::{self, PipelineError};
use procid_types::{IdentificationSettings, PidGains, TuningRule};
use thiserror::Error;

/// Tuning rules selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Rule {
    /// Chien-Hrones-Reswick, 0% overshoot
    Chr,
    /// Chien-Hrones-Reswick, 20% overshoot
    ChrOvershoot,
    /// ITAE setpoint tracking
    Itae,
}

impl From<Rule> for TuningRule {
    fn from(rule: Rule) -> Self {
        match rule {
            Rule::Chr => TuningRule::Chr,
            Rule::ChrOvershoot => TuningRule::ChrWithOvershoot,
            Rule::Itae => TuningRule::Itae,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "procid")]
#[command(about = "FOPDT identification, PID tuning and closed-loop preview")]
#[command(version)]
struct Args {
    /// Experiment record (JSON)
    experiment: PathBuf,

    /// Tuning rule [default: chr]
    #[arg(short, long, value_enum, conflicts_with = "kp")]
    rule: Option<Rule>,

    /// Manual proportional gain, instead of a tuning rule
    #[arg(long, requires = "ti", allow_negative_numbers = true)]
    kp: Option<f64>,

    /// Manual integral time in seconds
    #[arg(long, requires = "kp")]
    ti: Option<f64>,

    /// Manual derivative time in seconds
    #[arg(long, requires = "kp", default_value = "0.0")]
    td: f64,

    /// Closed-loop setpoint step
    #[arg(short, long, default_value = "1.0")]
    setpoint: f64,

    /// Identification settings (JSON); defaults when omitted
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write measured, model and closed-loop traces to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("CSV export failed: {0}")]
    Export(#[from] ExportError),
}

fn run(args: Args) -> Result<(), CliError> {
    let settings = match &args.settings {
        Some(path) => load_settings(path)?,
        None => IdentificationSettings::default(),
    };
    let experiment = load_experiment(&args.experiment)?;
    if let Some(description) = &experiment.description {
        println!("{}\n", description);
    }

    let report = match (args.kp, args.ti) {
        (Some(kp), Some(ti)) => {
            let gains = PidGains { kp, ti, td: args.td };
            pipeline::run_with_gains(&experiment, settings, gains, args.setpoint)?
        }
        _ => {
            let rule = args.rule.unwrap_or(Rule::Chr);
            pipeline::run(&experiment, settings, rule.into(), args.setpoint)?
        }
    };
    println!("{}", report);

    if let Some(path) = &args.csv {
        let measured = procid_types::Trace::new(experiment.time.clone(), experiment.output.clone());
        save_traces_csv(
            &path.to_string_lossy(),
            &["measured", "model", "closed_loop"],
            &[&measured, &report.identification.model, &report.closed_loop.trace],
        )?;
        println!("\nTraces written to {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_gains_parse() {
        let args = Args::try_parse_from(["procid", "step.json", "--kp", "1.5", "--ti", "8"]).unwrap();
        assert_eq!((args.kp, args.ti, args.td), (Some(1.5), Some(8.0), 0.0));
        assert!(args.rule.is_none());
    }

    #[test]
    fn test_manual_gains_conflict_with_rule() {
        let result =
            Args::try_parse_from(["procid", "step.json", "--rule", "itae", "--kp", "1", "--ti", "8"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_manual_gains_need_integral_time() {
        assert!(Args::try_parse_from(["procid", "step.json", "--kp", "1"]).is_err());
        assert!(Args::try_parse_from(["procid", "step.json", "--td", "1"]).is_err());
    }
}
