//! Experiment and settings loading, CSV export of traces

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use procid_types::{ExperimentError, IdentificationSettings, StepExperiment, Trace};
use thiserror::Error;

use crate::utils::resample;

/// Errors while loading an experiment or settings file
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed record: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid experiment: {0}")]
    Invalid(#[from] ExperimentError),
}

/// Errors while exporting traces
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Number of labels ({labels}) must match number of traces ({traces})")]
    LabelMismatch { labels: usize, traces: usize },

    #[error("Nothing to export")]
    Empty,
}

/// Parse and validate a JSON experiment record
pub fn parse_experiment(json: &str) -> Result<StepExperiment, LoadError> {
    let experiment: StepExperiment = serde_json::from_str(json)?;
    experiment.validate()?;
    Ok(experiment)
}

/// Load and validate a JSON experiment record from `path`
pub fn load_experiment(path: impl AsRef<Path>) -> Result<StepExperiment, LoadError> {
    let mut contents = String::new();
    File::open(path)?.read_to_string(&mut contents)?;
    parse_experiment(&contents)
}

/// Load identification settings; missing fields take their defaults
pub fn load_settings(path: impl AsRef<Path>) -> Result<IdentificationSettings, LoadError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(io::BufReader::new(file))?)
}

/// Write traces as CSV columns on the time grid of the first trace.
///
/// Other traces are linearly interpolated onto that grid.
///
/// # CSV Format
///
/// ```csv
/// time [s],measured,model
/// 0.0,0.0,0.0
/// 0.1,0.01,0.0
/// ```
pub fn write_traces_csv<W: Write>(writer: W, labels: &[&str], traces: &[&Trace]) -> Result<(), ExportError> {
    if labels.len() != traces.len() {
        return Err(ExportError::LabelMismatch {
            labels: labels.len(),
            traces: traces.len(),
        });
    }
    let grid = match traces.first() {
        Some(trace) if !trace.is_empty() => &trace.time,
        _ => return Err(ExportError::Empty),
    };

    let columns: Vec<Vec<f64>> = traces
        .iter()
        .map(|trace| resample(&trace.time, &trace.values, grid))
        .collect();

    let mut wtr = csv::Writer::from_writer(writer);
    let mut header = vec!["time [s]".to_string()];
    header.extend(labels.iter().map(|&s| s.to_string()));
    wtr.write_record(&header)?;

    for (i, t) in grid.iter().enumerate() {
        let mut record = vec![t.to_string()];
        record.extend(columns.iter().map(|c| c.get(i).map_or(String::new(), |v| v.to_string())));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save traces to a CSV file, adding the `.csv` extension when missing
pub fn save_traces_csv(filename: &str, labels: &[&str], traces: &[&Trace]) -> Result<(), ExportError> {
    let filename = if filename.to_lowercase().ends_with(".csv") {
        filename.to_string()
    } else {
        format!("{}.csv", filename)
    };
    write_traces_csv(File::create(&filename)?, labels, traces)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_experiment_validates() {
        let ok = parse_experiment(r#"{ "time": [0, 1, 2], "output": [0, 1, 1] }"#);
        assert!(ok.is_ok());

        let bad = parse_experiment(r#"{ "time": [0, 1], "output": [0] }"#);
        assert!(matches!(bad, Err(LoadError::Invalid(ExperimentError::LengthMismatch { .. }))));

        let malformed = parse_experiment("{ not json");
        assert!(matches!(malformed, Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_write_traces_csv() {
        let measured = Trace::new(vec![0.0, 1.0, 2.0], vec![0.0, 0.5, 1.0]);
        let model = Trace::new(vec![0.0, 2.0], vec![0.0, 2.0]);
        let mut buf = Vec::new();
        write_traces_csv(&mut buf, &["measured", "model"], &[&measured, &model]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "time [s],measured,model");
        assert_eq!(lines[2], "1,0.5,1");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_write_traces_csv_label_mismatch() {
        let trace = Trace::new(vec![0.0], vec![1.0]);
        let result = write_traces_csv(Vec::new(), &["a", "b"], &[&trace]);
        assert!(matches!(result, Err(ExportError::LabelMismatch { labels: 2, traces: 1 })));
        let result = write_traces_csv(Vec::new(), &[], &[]);
        assert!(matches!(result, Err(ExportError::Empty)));
    }
}
