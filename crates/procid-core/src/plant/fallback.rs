//! Block-level simulator used when the transfer-function path fails
//!
//! The loop is wired sample by sample: an optional PID on the tracking
//! error, a transport delay with interpolated history and the first-order
//! lag. The dead time is exact here, not a Padé approximation.

use procid_types::{FopdtParams, PidGains};

use crate::block::Block;
use crate::blocks::{FirstOrderLag, Pid, TransportDelay};
use crate::utils::constants::{FALLBACK_MAX_SUBSTEPS, FALLBACK_STEPS_PER_SCALE};

/// Shortest time scale the sub-step has to resolve
fn time_scale(params: &FopdtParams, gains: Option<&PidGains>) -> f64 {
    let mut scale = params.tau;
    if params.theta > 0.0 {
        scale = scale.min(params.theta);
    }
    if let Some(gains) = gains {
        scale = scale.min(params.tau / (1.0 + (params.k * gains.kp).abs()));
        if gains.td > 0.0 {
            scale = scale.min(gains.td);
        }
    }
    scale
}

/// Simulate from rest. `input` is the plant input for open loop, or the
/// reference when `gains` closes the loop; it is linear between samples.
pub(crate) fn simulate(
    params: &FopdtParams,
    gains: Option<&PidGains>,
    time: &[f64],
    input: &[f64],
) -> Vec<f64> {
    let len = time.len().min(input.len());
    if len == 0 {
        return Vec::new();
    }

    let mut lag = FirstOrderLag::new(params.k, params.tau);
    let mut delay = TransportDelay::new(params.theta);
    let mut pid = gains.map(Pid::from_gains);
    let h_max = time_scale(params, gains) / FALLBACK_STEPS_PER_SCALE;

    let mut outputs = Vec::with_capacity(len);
    outputs.push(lag.update(time[0]));

    for k in 1..len {
        let (t0, dt) = (time[k - 1], time[k] - time[k - 1]);
        if dt > 0.0 {
            let substeps = ((dt / h_max).ceil() as usize).clamp(1, FALLBACK_MAX_SUBSTEPS);
            let h = dt / substeps as f64;
            let slope = (input[k] - input[k - 1]) / dt;
            for i in 0..substeps {
                let t = t0 + i as f64 * h;
                let reference = input[k - 1] + slope * (t - t0);

                let y = lag.update(t);
                let u = match pid.as_mut() {
                    Some(pid) => {
                        pid.set_input(reference - y);
                        pid.update(t)
                    }
                    None => reference,
                };
                delay.set_input(u);
                lag.set_input(delay.update(t));

                lag.step(t, h);
                delay.step(t, h);
                if let Some(pid) = pid.as_mut() {
                    pid.step(t, h);
                }
            }
        }
        outputs.push(lag.update(time[k]));
    }
    outputs
}
