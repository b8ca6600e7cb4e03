//! Level-crossing search on sampled traces

use crate::utils::constants::FLAT_PAIR_EPS;

/// How a crossing time was obtained
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Crossing {
    /// Linear interpolation inside the first bracketing sample pair
    Interpolated(f64),
    /// No pair brackets the level; time of the closest sample
    Nearest(f64),
}

impl Crossing {
    pub fn time(&self) -> f64 {
        match *self {
            Crossing::Interpolated(t) | Crossing::Nearest(t) => t,
        }
    }
}

/// Time at which `values` first reaches `level`, rising or falling.
///
/// The first adjacent pair with the level between its values (inclusive) is
/// interpolated linearly; a flat pair returns its earlier time.
pub fn first_crossing(time: &[f64], values: &[f64], level: f64) -> Option<f64> {
    let n = time.len().min(values.len());
    (1..n).find_map(|i| {
        let (y0, y1) = (values[i - 1], values[i]);
        let brackets = (y0 <= level && level <= y1) || (y0 >= level && level >= y1);
        if !brackets {
            return None;
        }
        let (t0, t1) = (time[i - 1], time[i]);
        if (y1 - y0).abs() < FLAT_PAIR_EPS {
            return Some(t0);
        }
        Some(t0 + (level - y0) / (y1 - y0) * (t1 - t0))
    })
}

/// Time of the first sample closest to `level`
pub fn nearest_sample(time: &[f64], values: &[f64], level: f64) -> Option<f64> {
    let n = time.len().min(values.len());
    let mut best: Option<(usize, f64)> = None;
    for (i, y) in values[..n].iter().enumerate() {
        let distance = (y - level).abs();
        if distance.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((i, distance));
        }
    }
    best.map(|(i, _)| time[i])
}

/// Interpolated first crossing, else the nearest sample
pub fn find_crossing(time: &[f64], values: &[f64], level: f64) -> Option<Crossing> {
    first_crossing(time, values, level)
        .map(Crossing::Interpolated)
        .or_else(|| nearest_sample(time, values, level).map(Crossing::Nearest))
}
