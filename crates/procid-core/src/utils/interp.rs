//! Linear interpolation helpers shared by simulation, identification and metrics

/// Linearly interpolate `(xs, ys)` at `x`, clamping to the end values outside
/// the sampled range.
///
/// `xs` must be non-decreasing. Returns `None` for empty input or a NaN `x`.
pub fn interp_clamped(xs: &[f64], ys: &[f64], x: f64) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n == 0 || x.is_nan() {
        return None;
    }
    if x <= xs[0] {
        return Some(ys[0]);
    }
    if x >= xs[n - 1] {
        return Some(ys[n - 1]);
    }
    // First index with xs[i] > x; 1 <= i <= n - 1 here
    let i = xs[..n].partition_point(|&v| v <= x);
    let (x0, x1) = (xs[i - 1], xs[i]);
    let (y0, y1) = (ys[i - 1], ys[i]);
    if x1 == x0 {
        return Some(y0);
    }
    Some(y0 + (x - x0) / (x1 - x0) * (y1 - y0))
}

/// Resample `(xs, ys)` onto `targets` with [`interp_clamped`]
pub fn resample(xs: &[f64], ys: &[f64], targets: &[f64]) -> Vec<f64> {
    targets
        .iter()
        .filter_map(|&x| interp_clamped(xs, ys, x))
        .collect()
}

/// Resample `values` to `len` samples over a normalized [0, 1] index space.
///
/// Used when two series describe the same interval but were recorded with
/// different sample counts. An empty input yields an empty output.
pub fn resample_by_index(values: &[f64], len: usize) -> Vec<f64> {
    match values.len() {
        0 => Vec::new(),
        1 => vec![values[0]; len],
        n if n == len => values.to_vec(),
        n => {
            let src: Vec<f64> = (0..n).map(|i| i as f64 / (n - 1) as f64).collect();
            (0..len)
                .map(|j| {
                    let x = if len > 1 {
                        j as f64 / (len - 1) as f64
                    } else {
                        0.0
                    };
                    interp_clamped(&src, values, x).unwrap_or(values[0])
                })
                .collect()
        }
    }
}
