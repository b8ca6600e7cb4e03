//! Metric properties over randomized and analytic responses

use approx::assert_relative_eq;
use procid_core::metrics::{mean_squared_error, overshoot, rise_time, settling_time};
use procid_core::{compute_metrics, simulate_open_loop};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn grid(t_end: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| t_end * i as f64 / (n - 1) as f64).collect()
}

/// Monotone random walk from 0 towards 1
fn random_monotone(rng: &mut StdRng, n: usize) -> Vec<f64> {
    let mut y = Vec::with_capacity(n);
    let mut acc = 0.0;
    for _ in 0..n {
        acc += rng.gen_range(0.0..1.0);
        y.push(acc);
    }
    let total = acc;
    y.iter().map(|v| v / total).collect()
}

#[test]
fn test_mse_symmetric_and_non_negative() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..50 {
        let n = rng.gen_range(1..200);
        let a: Vec<f64> = (0..n).map(|_| rng.gen_range(-5.0..5.0)).collect();
        let b: Vec<f64> = (0..n).map(|_| rng.gen_range(-5.0..5.0)).collect();

        let ab = mean_squared_error(&a, &b).unwrap();
        let ba = mean_squared_error(&b, &a).unwrap();
        assert!(ab >= 0.0);
        assert_relative_eq!(ab, ba, max_relative = 1e-12);
        assert_eq!(mean_squared_error(&a, &a), Some(0.0));
    }
}

#[test]
fn test_wider_rise_band_takes_longer() {
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..50 {
        let n = rng.gen_range(10..300);
        let t = grid(10.0, n);
        let y = random_monotone(&mut rng, n);

        let wide = rise_time(&t, &y, 0.1, 0.9, None).unwrap();
        let narrow = rise_time(&t, &y, 0.2, 0.8, None).unwrap();
        assert!(wide >= narrow, "wide {} < narrow {}", wide, narrow);
    }
}

#[test]
fn test_open_loop_metrics_match_first_order_theory() {
    // K=1, tau=2, no delay: rise 2 ln 9, settling 2 ln 50, no overshoot
    let time = grid(40.0, 4001);
    let sim = simulate_open_loop(1.0, 2.0, 0.0, &time).unwrap();
    let m = compute_metrics(sim.time(), sim.output(), Some(1.0));

    assert_relative_eq!(m.rise_time.unwrap(), 2.0 * 9.0_f64.ln(), epsilon = 1e-3);
    assert_relative_eq!(m.settling_time.unwrap(), 2.0 * 50.0_f64.ln(), epsilon = 0.02);
    assert!(m.overshoot.unwrap() <= 1e-9);
    assert!(m.steady_state_error.unwrap().abs() < 1e-6);
}

#[test]
fn test_setpoint_overrides_tail_estimate() {
    let t = grid(4.0, 5);
    let y = [0.0, 0.6, 0.8, 0.8, 0.8];
    // Against its own tail the response has settled without overshoot
    assert_relative_eq!(overshoot(&y, None).unwrap(), 0.0);
    assert_eq!(settling_time(&t, &y, 0.02, None), Some(2.0));
    // Against setpoint 1 it never enters the band
    assert_relative_eq!(overshoot(&y, Some(1.0)).unwrap(), -0.2, epsilon = 1e-12);
    assert_eq!(settling_time(&t, &y, 0.02, Some(1.0)), Some(4.0));
}
