//! Matrix exponential by scaling and squaring of a truncated Taylor series

use nalgebra::DMatrix;

/// Scaled matrices have infinity norm at most this value
const SCALED_NORM: f64 = 0.5;

const MAX_TERMS: usize = 30;

/// Maximum absolute row sum
pub fn inf_norm(m: &DMatrix<f64>) -> f64 {
    m.row_iter()
        .map(|row| row.iter().map(|v| v.abs()).sum::<f64>())
        .fold(0.0, f64::max)
}

/// `exp(m)` for a square matrix; `None` when the input or result is not finite
pub fn expm(m: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    let n = m.nrows();
    if n == 0 {
        return Some(m.clone());
    }
    let norm = inf_norm(m);
    if !norm.is_finite() {
        return None;
    }

    let squarings = if norm > SCALED_NORM {
        (norm / SCALED_NORM).log2().ceil() as i32
    } else {
        0
    };
    let scaled = m / 2f64.powi(squarings);

    let mut result = DMatrix::<f64>::identity(n, n);
    let mut term = DMatrix::<f64>::identity(n, n);
    for k in 1..=MAX_TERMS {
        term = &term * &scaled / k as f64;
        result += &term;
        if inf_norm(&term) <= f64::EPSILON * inf_norm(&result) {
            break;
        }
    }
    for _ in 0..squarings {
        result = &result * &result;
    }

    if result.iter().all(|v| v.is_finite()) {
        Some(result)
    } else {
        None
    }
}
