//! Polynomial arithmetic on coefficient slices in descending powers of s

/// Product of two polynomials (discrete convolution)
pub fn poly_mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &ai) in a.iter().enumerate() {
        for (j, &bj) in b.iter().enumerate() {
            out[i + j] += ai * bj;
        }
    }
    out
}

/// Sum of two polynomials, aligned on the constant term
pub fn poly_add(a: &[f64], b: &[f64]) -> Vec<f64> {
    let n = a.len().max(b.len());
    let mut out = vec![0.0; n];
    for (dst, &v) in out[n - a.len()..].iter_mut().zip(a) {
        *dst += v;
    }
    for (dst, &v) in out[n - b.len()..].iter_mut().zip(b) {
        *dst += v;
    }
    out
}

/// Evaluate with Horner's scheme
pub fn poly_eval(p: &[f64], x: f64) -> f64 {
    p.iter().fold(0.0, |acc, &c| acc * x + c)
}

/// Drop exactly-zero leading coefficients, keeping at least one entry
pub fn poly_trim(p: &[f64]) -> Vec<f64> {
    match p.iter().position(|&c| c != 0.0) {
        Some(i) => p[i..].to_vec(),
        None => vec![0.0],
    }
}
