//! Closed-loop simulation and tuning-rule guards

use approx::assert_abs_diff_eq;
use procid_core::plant::PlantModel;
use procid_core::{chr, chr_with_overshoot, compute_metrics, itae, simulate_closed_loop, TuningError};
use procid_types::{Discretization, FopdtParams, PidGains, SimulationSettings};

fn grid(t_end: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| t_end * i as f64 / (n - 1) as f64).collect()
}

/// CHR on K=1, tau=5, theta=0.5 over 500 samples: bounded, finite overshoot
#[test]
fn test_chr_closed_loop_is_bounded() {
    let gains = chr(1.0, 5.0, 0.5).unwrap();
    let time = grid(100.0, 500);

    let sim = simulate_closed_loop(1.0, 5.0, 0.5, &gains, &time, None, 1.0).unwrap();

    assert_eq!(sim.output().len(), 500);
    assert!(sim.output().iter().all(|y| y.is_finite() && y.abs() < 10.0));
    let m = compute_metrics(sim.time(), sim.output(), Some(1.0));
    assert!(m.overshoot.unwrap().is_finite());
    assert!(m.steady_state_error.unwrap().abs() < 0.01);
}

#[test]
fn test_every_rule_tracks_setpoint() {
    let time = grid(150.0, 1501);
    for tune in [chr, chr_with_overshoot, itae] {
        let gains = tune(2.0, 10.0, 3.0).unwrap();
        let sim = simulate_closed_loop(2.0, 10.0, 3.0, &gains, &time, None, 1.0).unwrap();
        let tail = &sim.output()[1400..];
        for y in tail {
            assert_abs_diff_eq!(*y, 1.0, epsilon = 0.02);
        }
    }
}

#[test]
fn test_closed_loop_with_reference_signal() {
    let time = grid(100.0, 1001);
    let reference: Vec<f64> = time.iter().map(|&t| if t < 50.0 { 1.0 } else { 2.0 }).collect();
    let gains = chr(1.0, 5.0, 0.5).unwrap();

    let sim = simulate_closed_loop(1.0, 5.0, 0.5, &gains, &time, Some(&reference), 1.0).unwrap();

    assert_abs_diff_eq!(sim.output()[499], 1.0, epsilon = 0.02);
    assert_abs_diff_eq!(sim.output()[1000], 2.0, epsilon = 0.02);
}

#[test]
fn test_rk4_and_foh_agree_in_closed_loop() {
    let time = grid(60.0, 601);
    let gains = PidGains::new(1.0, 8.0, 0.0).unwrap();
    let params = FopdtParams::new(1.0, 5.0, 1.0);
    let run = |discretization| {
        let settings = SimulationSettings {
            pade_order: 6,
            discretization,
        };
        PlantModel::new(params, settings)
            .unwrap()
            .simulate_closed_loop_step(&gains, &time, None, 1.0)
            .unwrap()
    };

    let foh = run(Discretization::FirstOrderHold);
    let rk4 = run(Discretization::Rk4);
    for (a, b) in foh.output().iter().zip(rk4.output()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-3);
    }
}

#[test]
fn test_degenerate_plants_are_errors() {
    assert!(matches!(
        chr(0.0, 5.0, 0.5),
        Err(TuningError::Domain { name: "k", .. })
    ));
    assert!(matches!(
        itae(1.0, 0.0, 0.5),
        Err(TuningError::Domain { name: "tau", .. })
    ));
    assert!(chr_with_overshoot(1.0, f64::INFINITY, 0.5).is_err());

    let gains = PidGains { kp: 1.0, ti: 1.0, td: 0.0 };
    assert!(simulate_closed_loop(1.0, -1.0, 0.5, &gains, &[0.0, 1.0], None, 1.0).is_err());
    let bad = PidGains { kp: 1.0, ti: 0.0, td: 0.0 };
    assert!(simulate_closed_loop(1.0, 5.0, 0.5, &bad, &[0.0, 1.0], None, 1.0).is_err());
}
