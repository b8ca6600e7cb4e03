//! Step-response performance indicators
//!
//! All functions are pure and return `None` for empty input instead of
//! panicking. The final value is the setpoint when one is given, otherwise
//! the mean of the trailing samples.

use crate::identification::crossing::first_crossing;
use crate::utils::constants::{
    OVERSHOOT_EPS, RISE_HIGH, RISE_LOW, SETTLING_TOLERANCE, STEADY_STATE_FRACTION,
};
use crate::utils::resample_by_index;

/// Indicators of one step response
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepMetrics {
    /// 10%-90% rise time in seconds
    pub rise_time: Option<f64>,
    /// Relative overshoot (0.2 = 20%)
    pub overshoot: Option<f64>,
    /// 2% settling time in seconds
    pub settling_time: Option<f64>,
    pub steady_state_error: Option<f64>,
}

/// Mean of the last 5% of samples, at least one
pub fn steady_state_value(y: &[f64]) -> Option<f64> {
    if y.is_empty() {
        return None;
    }
    let count = ((y.len() as f64 * STEADY_STATE_FRACTION) as usize).max(1);
    let tail = &y[y.len() - count..];
    Some(tail.iter().sum::<f64>() / count as f64)
}

/// Setpoint when given, else [`steady_state_value`]
pub fn final_value(y: &[f64], setpoint: Option<f64>) -> Option<f64> {
    if y.is_empty() {
        return None;
    }
    setpoint.or_else(|| steady_state_value(y))
}

/// Mean squared error between two series.
///
/// When the lengths differ, `estimate` is resampled to the length of
/// `reference` over a normalized index space.
pub fn mean_squared_error(reference: &[f64], estimate: &[f64]) -> Option<f64> {
    if reference.is_empty() || estimate.is_empty() {
        return None;
    }
    let resampled;
    let estimate = if estimate.len() == reference.len() {
        estimate
    } else {
        resampled = resample_by_index(estimate, reference.len());
        &resampled
    };
    let sum: f64 = reference
        .iter()
        .zip(estimate)
        .map(|(a, b)| (a - b) * (a - b))
        .sum();
    Some(sum / reference.len() as f64)
}

/// Time between the first crossings of the `low` and `high` fractions of
/// the change from `y[0]` to the final value. Works for falling responses.
pub fn rise_time(t: &[f64], y: &[f64], low: f64, high: f64, setpoint: Option<f64>) -> Option<f64> {
    let y_final = final_value(y, setpoint)?;
    let y0 = y[0];
    let delta = y_final - y0;
    if delta == 0.0 {
        return None;
    }
    let t_low = first_crossing(t, y, y0 + low * delta)?;
    let t_high = first_crossing(t, y, y0 + high * delta)?;
    Some(t_high - t_low)
}

/// `(max(y) - final) / |final|`; `None` when the final value is ~0
pub fn overshoot(y: &[f64], setpoint: Option<f64>) -> Option<f64> {
    let y_final = final_value(y, setpoint)?;
    if y_final.abs() < OVERSHOOT_EPS {
        return None;
    }
    let peak = y.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((peak - y_final) / y_final.abs())
}

/// Time after the last sample outside `|y - final| <= tolerance * |final|`.
///
/// The first time when the response is always in band; the last time when
/// the last sample is still out of band.
pub fn settling_time(t: &[f64], y: &[f64], tolerance: f64, setpoint: Option<f64>) -> Option<f64> {
    let n = t.len().min(y.len());
    if n == 0 {
        return None;
    }
    let y_final = final_value(y, setpoint)?;
    let band = tolerance * y_final.abs();
    match y[..n].iter().rposition(|v| (v - y_final).abs() > band) {
        None => Some(t[0]),
        Some(last_out) if last_out + 1 < n => Some(t[last_out + 1]),
        Some(_) => Some(t[n - 1]),
    }
}

/// `setpoint - steady` when a setpoint is given, else `steady - y[0]`
pub fn steady_state_error(y: &[f64], setpoint: Option<f64>) -> Option<f64> {
    let steady = steady_state_value(y)?;
    Some(match setpoint {
        Some(sp) => sp - steady,
        None => steady - y[0],
    })
}

/// Rise time (10-90%), overshoot, 2% settling time and steady-state error
pub fn compute_metrics(t: &[f64], y: &[f64], setpoint: Option<f64>) -> StepMetrics {
    StepMetrics {
        rise_time: rise_time(t, y, RISE_LOW, RISE_HIGH, setpoint),
        overshoot: overshoot(y, setpoint),
        settling_time: settling_time(t, y, SETTLING_TOLERANCE, setpoint),
        steady_state_error: steady_state_error(y, setpoint),
    }
}
