//! Padé approximation of a pure time delay
//!
//! `exp(-theta*s) ≈ Q(-s) / Q(s)` with
//! `Q(s) = Σ_k c_k (theta*s)^k`, `c_k = (2n-k)! n! / ((2n)! k! (n-k)!)`.

use super::{LtiError, TransferFunction};

/// Coefficients `c_0..=c_n` of the diagonal [n/n] Padé approximant
fn pade_coefficients(order: usize) -> Vec<f64> {
    let n = order as f64;
    let mut c = Vec::with_capacity(order + 1);
    let mut ck = 1.0;
    c.push(ck);
    for k in 0..order {
        let k = k as f64;
        ck *= (n - k) / ((2.0 * n - k) * (k + 1.0));
        c.push(ck);
    }
    c
}

/// Rational approximation of `exp(-theta*s)` of the given order.
///
/// Returns the unit gain `1/1` when `theta == 0` or `order == 0`.
/// The result has DC gain exactly 1.
pub fn pade(theta: f64, order: usize) -> Result<TransferFunction, LtiError> {
    if !theta.is_finite() || theta < 0.0 {
        return Err(LtiError::InvalidDelay(theta));
    }
    if theta == 0.0 || order == 0 {
        return TransferFunction::new(vec![1.0], vec![1.0]);
    }

    let c = pade_coefficients(order);
    // Descending powers: index 0 holds s^order
    let mut num = Vec::with_capacity(order + 1);
    let mut den = Vec::with_capacity(order + 1);
    for k in (0..=order).rev() {
        let coeff = c[k] * theta.powi(k as i32);
        let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
        num.push(sign * coeff);
        den.push(coeff);
    }
    TransferFunction::new(num, den)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_order_pade() {
        // (1 - theta*s/2) / (1 + theta*s/2)
        let tf = pade(2.0, 1).unwrap();
        assert_eq!(tf.num(), &[-1.0, 1.0]);
        assert_eq!(tf.den(), &[1.0, 1.0]);
    }

    #[test]
    fn test_second_order_coefficients() {
        let c = pade_coefficients(2);
        assert_relative_eq!(c[1], 0.5);
        assert_relative_eq!(c[2], 1.0 / 12.0);
    }

    #[test]
    fn test_unit_dc_gain() {
        for order in [1, 5, 10, 20] {
            let tf = pade(3.0, order).unwrap();
            assert_relative_eq!(tf.dc_gain().unwrap(), 1.0, epsilon = 1e-12);
            assert_eq!(tf.order(), order);
        }
    }

    #[test]
    fn test_zero_delay_is_identity() {
        let tf = pade(0.0, 10).unwrap();
        assert_eq!(tf.order(), 0);
        assert_eq!(tf.dc_gain(), Some(1.0));
        assert_eq!(pade(1.0, 0).unwrap().order(), 0);
    }

    #[test]
    fn test_negative_delay_rejected() {
        assert!(matches!(pade(-1.0, 4), Err(LtiError::InvalidDelay(_))));
    }

    #[test]
    fn test_all_pass_magnitude() {
        // |Q(-jw)| == |Q(jw)| for real coefficients
        let tf = pade(1.5, 6).unwrap();
        let w: f64 = 0.7;
        let (mut nr, mut ni, mut dr, mut di) = (0.0, 0.0, 0.0, 0.0);
        let order = tf.order();
        for (i, (&a, &b)) in tf.num().iter().zip(tf.den()).enumerate() {
            let k = (order - i) as i32;
            let re = (w.powi(k)) * [1.0, 0.0, -1.0, 0.0][(k % 4) as usize];
            let im = (w.powi(k)) * [0.0, 1.0, 0.0, -1.0][(k % 4) as usize];
            nr += a * re;
            ni += a * im;
            dr += b * re;
            di += b * im;
        }
        assert_relative_eq!((nr * nr + ni * ni).sqrt(), (dr * dr + di * di).sqrt(), epsilon = 1e-12);
    }
}
