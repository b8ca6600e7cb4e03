//! SISO transfer functions in polynomial form
//!
//!   H(s) = B(s) / A(s) = (b_n s^n + ... + b_0) / (a_m s^m + ... + a_0)
//!
//! Coefficients are stored in descending powers of s. Composition (series,
//! unity feedback) is done on the polynomials so that improper factors such
//! as an ideal PID can be combined before realization.
//!
//! References:
//! - Ogata, K. (2010). Modern Control Engineering (5th ed.). Section 5.6
//! - Chen, C.T. (1999). Linear System Theory and Design (3rd ed.). Section 5.5

use nalgebra::{DMatrix, DVector};

use super::polynomial::{poly_add, poly_eval, poly_mul, poly_trim};
use super::{LtiError, StateSpace};

/// Transfer function with dynamically sized numerator and denominator
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction {
    num: Vec<f64>,
    den: Vec<f64>,
}

impl TransferFunction {
    /// Create from coefficients in descending powers of s.
    ///
    /// Exactly-zero leading coefficients are dropped. The denominator must
    /// keep at least one non-zero coefficient and every coefficient must be
    /// finite. Improper functions are accepted here and rejected at
    /// realization.
    pub fn new(num: Vec<f64>, den: Vec<f64>) -> Result<Self, LtiError> {
        if let Some(&bad) = num.iter().chain(den.iter()).find(|v| !v.is_finite()) {
            return Err(LtiError::NonFinite(bad));
        }
        let den = poly_trim(&den);
        if den[0] == 0.0 {
            return Err(LtiError::ZeroDenominator);
        }
        let num = if num.is_empty() {
            vec![0.0]
        } else {
            poly_trim(&num)
        };
        Ok(Self { num, den })
    }

    /// `k / (tau*s + 1)`
    pub fn first_order(k: f64, tau: f64) -> Result<Self, LtiError> {
        if !tau.is_finite() || tau <= 0.0 {
            return Err(LtiError::InvalidTimeConstant(tau));
        }
        Self::new(vec![k], vec![tau, 1.0])
    }

    pub fn num(&self) -> &[f64] {
        &self.num
    }

    pub fn den(&self) -> &[f64] {
        &self.den
    }

    /// Number of poles (denominator degree)
    pub fn order(&self) -> usize {
        self.den.len() - 1
    }

    /// Numerator degree does not exceed denominator degree
    pub fn is_proper(&self) -> bool {
        self.num.len() <= self.den.len()
    }

    /// `H(0)`, `None` when the function has a pole at the origin
    pub fn dc_gain(&self) -> Option<f64> {
        let den0 = poly_eval(&self.den, 0.0);
        if den0 == 0.0 {
            None
        } else {
            Some(poly_eval(&self.num, 0.0) / den0)
        }
    }

    /// Series connection `self * other`
    pub fn series(&self, other: &TransferFunction) -> Result<Self, LtiError> {
        Self::new(
            poly_mul(&self.num, &other.num),
            poly_mul(&self.den, &other.den),
        )
    }

    /// Unity negative feedback around `self`: `H / (1 + H)`
    pub fn feedback(&self) -> Result<Self, LtiError> {
        Self::new(self.num.clone(), poly_add(&self.den, &self.num))
    }

    /// Realize in controllable canonical form.
    ///
    /// For the denominator normalized to `s^n + a_1 s^{n-1} + ... + a_n`:
    ///
    ///   A = [-a_1  -a_2  ...  -a_{n-1}  -a_n]
    ///       [  1     0   ...     0        0 ]
    ///       [  ⋮     ⋱            ⋮       ⋮ ]
    ///       [  0     0   ...     1        0 ]
    ///
    ///   B = e_1, C = strictly proper numerator, D = b_n when degrees match.
    ///
    /// The realization is balanced with `x'_j = rho^(j-1) x_j`, where `rho`
    /// is the largest `|a_k|^(1/k)`, so every entry of `A` is at most `rho`
    /// in magnitude. This keeps high-order dead-time approximations well
    /// conditioned for the matrix exponential.
    pub fn to_state_space(&self) -> Result<StateSpace, LtiError> {
        if !self.is_proper() {
            return Err(LtiError::Improper {
                num: self.num.len() - 1,
                den: self.order(),
            });
        }

        let leading = self.den[0];
        let den_norm: Vec<f64> = self.den.iter().map(|&x| x / leading).collect();
        let mut num_norm: Vec<f64> = self.num.iter().map(|&x| x / leading).collect();
        while num_norm.len() < den_norm.len() {
            num_norm.insert(0, 0.0);
        }

        let n = self.order();
        let d = num_norm[0];
        // Strictly proper part: num - D*den, last n coefficients
        let c_coeffs: Vec<f64> = num_norm
            .iter()
            .zip(&den_norm)
            .skip(1)
            .map(|(&b, &a)| b - d * a)
            .collect();

        let rho = balancing_scale(&den_norm);
        let mut a = DMatrix::zeros(n, n);
        let mut b = DVector::zeros(n);
        let mut c = DVector::zeros(n);
        let mut scale = 1.0;
        for j in 0..n {
            // scale == rho^j
            a[(0, j)] = -den_norm[j + 1] / scale;
            c[j] = c_coeffs[j] / scale;
            if j + 1 < n {
                a[(j + 1, j)] = rho;
            }
            scale *= rho;
        }
        if n > 0 {
            b[0] = 1.0;
        }

        Ok(StateSpace::new(a, b, c, d, 2.0 * rho))
    }
}

/// Largest `|a_k|^(1/k)` of a monic denominator, or 1 when undefined.
///
/// Twice this value bounds the pole magnitudes (Fujiwara).
fn balancing_scale(den_norm: &[f64]) -> f64 {
    let rho = den_norm
        .iter()
        .enumerate()
        .skip(1)
        .map(|(k, a)| a.abs().powf(1.0 / k as f64))
        .fold(0.0, f64::max);
    if rho.is_finite() && rho > 0.0 {
        rho
    } else {
        1.0
    }
}
