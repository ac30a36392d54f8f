//! Synthetic failure table for the smart deployer.

use rand::Rng;

use crate::config::deploy::AUTO_RETRY_STEPS;
use crate::models::{DeploymentError, Severity};

/// A failure that can be injected into one step.
#[derive(Clone, Copy, Debug)]
pub struct Scenario {
    pub step_id: &'static str,
    pub code: &'static str,
    pub message: &'static str,
    pub suggestion: &'static str,
    pub severity: Severity,
    /// Transient failure that may go away on retry
    pub retryable: bool,
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        step_id: "analyze",
        code: "PARSE_ERROR",
        message: "Unable to parse contract source",
        suggestion: "Check the file for syntax errors and unbalanced braces.",
        severity: Severity::Medium,
        retryable: false,
    },
    Scenario {
        step_id: "verify-account",
        code: "ACCOUNT_NOT_DEPLOYED",
        message: "Account contract is not deployed on this network",
        suggestion: "Deploy your account contract or switch networks.",
        severity: Severity::High,
        retryable: false,
    },
    Scenario {
        step_id: "verify-account",
        code: "RPC_UNAVAILABLE",
        message: "RPC node did not answer the nonce query",
        suggestion: "The node may be overloaded. Try again in a moment.",
        severity: Severity::Medium,
        retryable: true,
    },
    Scenario {
        step_id: "compile",
        code: "COMPILATION_FAILED",
        message: "Sierra compilation failed",
        suggestion: "Run `scarb build` in the terminal to see the full diagnostics.",
        severity: Severity::High,
        retryable: false,
    },
    Scenario {
        step_id: "declare",
        code: "NETWORK_TIMEOUT",
        message: "Sequencer did not respond to the declare transaction",
        suggestion: "Network congestion is usually transient. Retry the deployment.",
        severity: Severity::Medium,
        retryable: true,
    },
    Scenario {
        step_id: "declare",
        code: "INSUFFICIENT_FEE",
        message: "Account balance is too low to cover the declare fee",
        suggestion: "Fund the account with STRK from a faucet and retry.",
        severity: Severity::High,
        retryable: false,
    },
    Scenario {
        step_id: "deploy",
        code: "NONCE_MISMATCH",
        message: "Transaction nonce is out of date",
        suggestion: "Another transaction was sent from this account. Retrying usually resolves it.",
        severity: Severity::Low,
        retryable: true,
    },
    Scenario {
        step_id: "deploy",
        code: "CONSTRUCTOR_FAILED",
        message: "Constructor execution reverted",
        suggestion: "Check the constructor arguments and their types.",
        severity: Severity::Critical,
        retryable: false,
    },
];

impl Scenario {
    /// Materialize into an error. Only auto-retry steps keep `retryable`.
    pub fn to_error(self) -> DeploymentError {
        DeploymentError {
            step_id: self.step_id,
            code: self.code,
            message: self.message.to_string(),
            suggestion: self.suggestion,
            severity: self.severity,
            retryable: self.retryable && AUTO_RETRY_STEPS.contains(&self.step_id),
        }
    }
}

/// Scenarios registered for `step_id`.
pub fn scenarios_for(step_id: &str) -> impl Iterator<Item = &'static Scenario> + '_ {
    SCENARIOS.iter().filter(move |s| s.step_id == step_id)
}

/// Roll one attempt of `step_id`; `Some` means the attempt failed.
pub fn roll_failure<R: Rng + ?Sized>(
    step_id: &str,
    rng: &mut R,
    rate: f64,
) -> Option<DeploymentError> {
    if !rng.gen_bool(rate.clamp(0.0, 1.0)) {
        return None;
    }
    let candidates: Vec<&Scenario> = scenarios_for(step_id).collect();
    if candidates.is_empty() {
        return None;
    }
    let scenario = candidates[rng.gen_range(0..candidates.len())];
    Some(scenario.to_error())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_every_smart_step_has_a_scenario() {
        for step in ["analyze", "verify-account", "compile", "declare", "deploy"] {
            assert!(scenarios_for(step).next().is_some(), "{step}");
        }
    }

    #[test]
    fn test_rate_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert!(roll_failure("declare", &mut rng, 0.0).is_none());
            let err = roll_failure("declare", &mut rng, 1.0).unwrap();
            assert_eq!(err.step_id, "declare");
        }
    }

    #[test]
    fn test_unknown_step_never_fails() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(roll_failure("no-such-step", &mut rng, 1.0).is_none());
    }

    #[test]
    fn test_retryable_only_on_auto_retry_steps() {
        for scenario in SCENARIOS {
            let err = scenario.to_error();
            if err.retryable {
                assert!(AUTO_RETRY_STEPS.contains(&err.step_id));
            }
        }
        let timeout = SCENARIOS.iter().find(|s| s.code == "NETWORK_TIMEOUT").unwrap();
        assert!(timeout.to_error().retryable);
    }
}
