//! Closed-form PID tuning rules for FOPDT plants
//!
//! Every rule checks that `K`, `tau` and `theta` are finite and non-zero and
//! that the resulting gains are valid before returning them.

use procid_types::{FopdtParams, ParamError, PidGains, TuningRule};
use thiserror::Error;

/// Tuning errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TuningError {
    #[error("{rule}: parameter '{name}' = {value} is outside the rule's domain")]
    Domain {
        rule: &'static str,
        name: &'static str,
        value: f64,
    },

    #[error("{rule}: resulting gains are invalid: {source}")]
    InvalidGains {
        rule: &'static str,
        source: ParamError,
    },
}

fn check_domain(rule: TuningRule, k: f64, tau: f64, theta: f64) -> Result<(), TuningError> {
    for (name, value) in [("k", k), ("tau", tau), ("theta", theta)] {
        if !value.is_finite() || value == 0.0 {
            return Err(TuningError::Domain {
                rule: rule.as_str(),
                name,
                value,
            });
        }
    }
    Ok(())
}

fn gains(rule: TuningRule, kp: f64, ti: f64, td: f64) -> Result<PidGains, TuningError> {
    PidGains::new(kp, ti, td).map_err(|source| TuningError::InvalidGains {
        rule: rule.as_str(),
        source,
    })
}

/// Chien-Hrones-Reswick, setpoint response with 0% overshoot:
/// `Kp = 0.6 tau/(K theta)`, `Ti = tau`, `Td = theta/2`
pub fn chr(k: f64, tau: f64, theta: f64) -> Result<PidGains, TuningError> {
    let rule = TuningRule::Chr;
    check_domain(rule, k, tau, theta)?;
    gains(rule, 0.6 * tau / (k * theta), tau, theta / 2.0)
}

/// Chien-Hrones-Reswick, setpoint response with 20% overshoot:
/// `Kp = 0.95 tau/(K theta)`, `Ti = 1.357 tau`, `Td = 0.473 theta`
pub fn chr_with_overshoot(k: f64, tau: f64, theta: f64) -> Result<PidGains, TuningError> {
    let rule = TuningRule::ChrWithOvershoot;
    check_domain(rule, k, tau, theta)?;
    gains(rule, 0.95 * tau / (k * theta), 1.357 * tau, 0.473 * theta)
}

/// ITAE setpoint tracking:
/// `Kp = (0.965/K) (theta/tau)^-0.85`,
/// `Ti = tau / (0.796 - 0.147 theta/tau)`,
/// `Td = 0.308 tau (theta/tau)^0.929`
pub fn itae(k: f64, tau: f64, theta: f64) -> Result<PidGains, TuningError> {
    let rule = TuningRule::Itae;
    check_domain(rule, k, tau, theta)?;
    let ratio = theta / tau;
    gains(
        rule,
        (0.965 / k) * ratio.powf(-0.85),
        tau / (0.796 - 0.147 * ratio),
        0.308 * tau * ratio.powf(0.929),
    )
}

/// Apply a tuning rule to identified plant parameters
pub trait Tune {
    fn apply(&self, params: &FopdtParams) -> Result<PidGains, TuningError>;
}

impl Tune for TuningRule {
    fn apply(&self, params: &FopdtParams) -> Result<PidGains, TuningError> {
        let FopdtParams { k, tau, theta } = *params;
        match self {
            TuningRule::Chr => chr(k, tau, theta),
            TuningRule::ChrWithOvershoot => chr_with_overshoot(k, tau, theta),
            TuningRule::Itae => itae(k, tau, theta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_chr_values() {
        let g = chr(1.0, 5.0, 0.5).unwrap();
        assert_relative_eq!(g.kp, 6.0, epsilon = 1e-12);
        assert_relative_eq!(g.ti, 5.0);
        assert_relative_eq!(g.td, 0.25);
    }

    #[test]
    fn test_chr_with_overshoot_values() {
        let g = chr_with_overshoot(2.0, 10.0, 1.0).unwrap();
        assert_relative_eq!(g.kp, 4.75, epsilon = 1e-12);
        assert_relative_eq!(g.ti, 13.57, epsilon = 1e-12);
        assert_relative_eq!(g.td, 0.473, epsilon = 1e-12);
    }

    #[test]
    fn test_itae_values() {
        let g = itae(1.0, 5.0, 0.5).unwrap();
        assert_relative_eq!(g.kp, 0.965 * 0.1_f64.powf(-0.85), epsilon = 1e-12);
        assert_relative_eq!(g.ti, 5.0 / (0.796 - 0.0147), epsilon = 1e-12);
        assert_relative_eq!(g.td, 0.308 * 5.0 * 0.1_f64.powf(0.929), epsilon = 1e-12);
    }

    #[test]
    fn test_zero_gain_is_domain_error() {
        assert_eq!(
            chr(0.0, 5.0, 0.5),
            Err(TuningError::Domain {
                rule: "CHR",
                name: "k",
                value: 0.0
            })
        );
    }

    #[test]
    fn test_zero_tau_is_domain_error() {
        assert!(matches!(
            itae(1.0, 0.0, 0.5),
            Err(TuningError::Domain { name: "tau", .. })
        ));
        assert!(matches!(
            chr(1.0, 5.0, f64::NAN),
            Err(TuningError::Domain { name: "theta", .. })
        ));
    }

    #[test]
    fn test_itae_long_dead_time_gives_invalid_gains() {
        // 0.796 - 0.147 * 6 < 0 -> negative integral time
        assert!(matches!(
            itae(1.0, 1.0, 6.0),
            Err(TuningError::InvalidGains {
                source: ParamError::NonPositiveIntegralTime(_),
                ..
            })
        ));
    }

    #[test]
    fn test_rule_dispatch() {
        let params = FopdtParams::new(1.0, 5.0, 0.5);
        assert_eq!(TuningRule::Chr.apply(&params), chr(1.0, 5.0, 0.5));
        assert_eq!(TuningRule::Itae.apply(&params), itae(1.0, 5.0, 0.5));
    }
}
