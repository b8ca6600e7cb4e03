//! Savitzky-Golay smoothing
//!
//! Each sample is replaced by the value at its position of a least-squares
//! polynomial fitted over a window of neighbouring samples. The first and
//! last half-windows are evaluated on the fit of the first and last full
//! window. Filtering works in sample-index space, so irregular sampling is
//! ignored.

use log::{debug, warn};
use nalgebra::{DMatrix, DVector};
use procid_types::SmoothingSettings;
use thiserror::Error;

use crate::utils::constants::MIN_SMOOTHING_SAMPLES;

/// Smoothing errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SmoothingError {
    #[error("Polynomial order {polyorder} must be less than window length {window}")]
    PolyorderTooLarge { polyorder: usize, window: usize },

    #[error("Window length {0} must be odd and at least 3")]
    InvalidWindow(usize),

    #[error("Window length {window} exceeds signal length {len}")]
    WindowTooLong { window: usize, len: usize },

    #[error("Least-squares fit is singular")]
    SingularFit,
}

/// Outcome of the smoothing stage
#[derive(Debug, Clone, PartialEq)]
pub enum SmoothingStatus {
    Applied { window: usize },
    /// Disabled, or too few samples
    Skipped,
    /// The filter rejected its parameters; the raw trace was used
    Failed(SmoothingError),
}

/// Fit a window to a trace of `len` samples: shrink below `len`, make odd,
/// then at least 3.
pub fn adjust_window(requested: usize, len: usize) -> usize {
    let mut window = requested;
    if window >= len {
        window = if len.saturating_sub(1) % 2 == 1 {
            len - 1
        } else {
            len.saturating_sub(2)
        };
    }
    if window % 2 == 0 {
        window += 1;
    }
    window.max(3)
}

/// Weights that evaluate the window fit at offset `x_eval` from the centre.
///
/// Offsets are scaled by the half-width so the normal equations stay well
/// conditioned for long windows.
fn fit_weights(window: usize, polyorder: usize, x_eval: f64) -> Result<DVector<f64>, SmoothingError> {
    let half = ((window - 1) / 2) as f64;
    let jacobian = DMatrix::from_fn(window, polyorder + 1, |i, j| {
        ((i as f64 - half) / half).powi(j as i32)
    });
    let normal = jacobian.transpose() * &jacobian;
    let cholesky = normal.cholesky().ok_or(SmoothingError::SingularFit)?;
    let basis = DVector::from_fn(polyorder + 1, |j, _| (x_eval / half).powi(j as i32));
    Ok(&jacobian * cholesky.solve(&basis))
}

fn apply(weights: &DVector<f64>, samples: &[f64]) -> f64 {
    weights.iter().zip(samples).map(|(w, y)| w * y).sum()
}

/// Savitzky-Golay filter with polynomial edge fits.
///
/// `window` must be odd, at least 3 and no longer than `values`;
/// `polyorder` must be below `window`.
pub fn savgol_filter(values: &[f64], window: usize, polyorder: usize) -> Result<Vec<f64>, SmoothingError> {
    if polyorder >= window {
        return Err(SmoothingError::PolyorderTooLarge { polyorder, window });
    }
    if window < 3 || window % 2 == 0 {
        return Err(SmoothingError::InvalidWindow(window));
    }
    let n = values.len();
    if window > n {
        return Err(SmoothingError::WindowTooLong { window, len: n });
    }

    let half = (window - 1) / 2;
    let mut out = vec![0.0; n];

    let centre = fit_weights(window, polyorder, 0.0)?;
    for i in half..n - half {
        out[i] = apply(&centre, &values[i - half..=i + half]);
    }

    let head = &values[..window];
    let tail = &values[n - window..];
    for k in 0..half {
        let offset = k as f64 - half as f64;
        out[k] = apply(&fit_weights(window, polyorder, offset)?, head);
        out[n - 1 - k] = apply(&fit_weights(window, polyorder, -offset)?, tail);
    }
    Ok(out)
}

/// Smooth a trace according to `settings`, falling back to the raw values.
///
/// `None` settings or fewer than five samples skip the filter.
pub fn smooth(values: &[f64], settings: Option<SmoothingSettings>) -> (Vec<f64>, SmoothingStatus) {
    let settings = match settings {
        Some(s) if values.len() >= MIN_SMOOTHING_SAMPLES => s,
        _ => return (values.to_vec(), SmoothingStatus::Skipped),
    };
    let window = adjust_window(settings.window, values.len());
    debug!(
        "Savitzky-Golay window {} (requested {}), order {}",
        window, settings.window, settings.polyorder
    );
    match savgol_filter(values, window, settings.polyorder) {
        Ok(smoothed) => (smoothed, SmoothingStatus::Applied { window }),
        Err(err) => {
            warn!("Smoothing skipped, using raw trace: {}", err);
            (values.to_vec(), SmoothingStatus::Failed(err))
        }
    }
}
