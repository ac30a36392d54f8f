//! Deployment step tables and per-step result generation.

use rand::RngCore;

use super::Workflow;
use super::runner::Simulation;
use super::scenarios::roll_failure;
use crate::config::deploy::{FAILURE_RATE, MAX_ATTEMPTS, STEP_DELAY_MS};
use crate::core::random::{class_hash, random_felt, short_hex};
use crate::models::{DeploymentError, DetectedContract, LogLevel, Network, Severity};

/// Steps of the click-through deployer.
pub const MANUAL_STEPS: &[(&str, &str)] = &[
    ("verify-account", "Verify account"),
    ("compile", "Compile contract"),
    ("declare", "Declare class"),
    ("deploy", "Deploy contract"),
];

/// Steps of the automatic deployer.
pub const SMART_STEPS: &[(&str, &str)] = &[
    ("analyze", "Analyze contract"),
    ("verify-account", "Verify account"),
    ("compile", "Compile contract"),
    ("declare", "Declare class"),
    ("deploy", "Deploy contract"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeployMode {
    /// One step per click, no failure injection
    Manual,
    /// Runs by itself with injected failures and auto-retry
    Smart,
}

impl DeployMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Smart => "smart",
        }
    }
}

/// What is being deployed, and where.
#[derive(Clone, Debug, PartialEq)]
pub struct DeployTarget {
    pub contract: DetectedContract,
    pub source: String,
    pub network: Network,
    /// Constructor argument values, in declaration order
    pub constructor_values: Vec<String>,
}

/// Values produced as steps succeed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeployArtifacts {
    pub account: Option<String>,
    pub class_hash: Option<String>,
    pub declare_tx: Option<String>,
    pub contract_address: Option<String>,
    pub deploy_tx: Option<String>,
}

/// One deployment dialog's worth of state.
#[derive(Clone, Debug, PartialEq)]
pub struct Deployment {
    pub mode: DeployMode,
    pub target: DeployTarget,
    pub workflow: Workflow,
    pub artifacts: DeployArtifacts,
    failure_rate: f64,
}

impl Deployment {
    pub fn new(mode: DeployMode, target: DeployTarget, now: u64) -> Self {
        let steps = match mode {
            DeployMode::Manual => MANUAL_STEPS,
            DeployMode::Smart => SMART_STEPS,
        };
        let mut workflow = Workflow::new(steps);
        workflow.log(
            now,
            LogLevel::Info,
            format!(
                "Deploying {} to {}",
                target.contract.name,
                target.network.name()
            ),
        );
        Self {
            mode,
            target,
            workflow,
            artifacts: DeployArtifacts::default(),
            failure_rate: FAILURE_RATE,
        }
    }

    /// Override the injected failure probability.
    #[cfg(test)]
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = rate;
        self
    }

    /// Reopen a failed deployment at its failed step.
    ///
    /// Artifacts of steps that already succeeded are kept.
    pub fn retry(&mut self, now: u64) -> bool {
        self.workflow.retry_failed(now)
    }

    /// Explorer link for the deployed contract.
    pub fn explorer_link(&self) -> Option<String> {
        self.artifacts
            .contract_address
            .as_ref()
            .map(|addr| format!("{}/contract/{}", self.target.network.explorer_url(), addr))
    }

    fn check_source(&self, step_id: &'static str) -> Result<(), DeploymentError> {
        if !self.target.source.trim().is_empty() {
            return Ok(());
        }
        Err(DeploymentError {
            step_id,
            code: "COMPILATION_FAILED",
            message: format!("{} is empty", self.target.contract.path),
            suggestion: "Add the contract source and save the file.",
            severity: Severity::High,
            retryable: false,
        })
    }

    fn check_arguments(&self, step_id: &'static str) -> Result<(), DeploymentError> {
        let expected = self.target.contract.constructor_args.len();
        let given = self.target.constructor_values.len();
        let missing = self
            .target
            .contract
            .constructor_args
            .iter()
            .zip(&self.target.constructor_values)
            .find(|(_, value)| value.trim().is_empty());

        if expected != given {
            return Err(DeploymentError {
                step_id,
                code: "INVALID_ARGUMENTS",
                message: format!("constructor expects {} arguments, got {}", expected, given),
                suggestion: "Fill in every constructor argument.",
                severity: Severity::Medium,
                retryable: false,
            });
        }
        if let Some(((name, _), _)) = missing {
            return Err(DeploymentError {
                step_id,
                code: "INVALID_ARGUMENTS",
                message: format!("constructor argument '{}' is empty", name),
                suggestion: "Fill in every constructor argument.",
                severity: Severity::Medium,
                retryable: false,
            });
        }
        Ok(())
    }

    fn produce(&mut self, step_id: &'static str, rng: &mut dyn RngCore) -> String {
        let artifacts = &mut self.artifacts;
        match step_id {
            "analyze" => {
                let args = &self.target.contract.constructor_args;
                format!(
                    "Found contract {} ({} constructor argument{})",
                    self.target.contract.name,
                    args.len(),
                    if args.len() == 1 { "" } else { "s" }
                )
            }
            "verify-account" => {
                let account = random_felt(rng);
                let detail = format!(
                    "Account {} ready on {}",
                    short_hex(&account),
                    self.target.network.name()
                );
                artifacts.account = Some(account);
                detail
            }
            "compile" => {
                let hash = class_hash(&self.target.source);
                let detail = format!("Class hash {}", short_hex(&hash));
                artifacts.class_hash = Some(hash);
                detail
            }
            "declare" => {
                let tx = random_felt(rng);
                let detail = format!("Declared in tx {}", short_hex(&tx));
                artifacts.declare_tx = Some(tx);
                detail
            }
            "deploy" => {
                let address = random_felt(rng);
                let tx = random_felt(rng);
                let detail = format!("Deployed at {}", short_hex(&address));
                artifacts.contract_address = Some(address);
                artifacts.deploy_tx = Some(tx);
                detail
            }
            _ => "done".to_string(),
        }
    }
}

impl Simulation for Deployment {
    fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    fn workflow_mut(&mut self) -> &mut Workflow {
        &mut self.workflow
    }

    fn step_delay(&self) -> u32 {
        STEP_DELAY_MS
    }

    fn max_attempts(&self) -> u32 {
        match self.mode {
            DeployMode::Manual => 1,
            DeployMode::Smart => MAX_ATTEMPTS,
        }
    }

    fn attempt(
        &mut self,
        step_id: &'static str,
        rng: &mut dyn RngCore,
    ) -> Result<String, DeploymentError> {
        match step_id {
            "analyze" => self.check_arguments(step_id)?,
            "compile" => self.check_source(step_id)?,
            _ => {}
        }
        if self.mode == DeployMode::Smart
            && let Some(err) = roll_failure(step_id, rng, self.failure_rate)
        {
            return Err(err);
        }
        Ok(self.produce(step_id, rng))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::core::deploy::runner::testing::InstantDelay;
    use crate::core::deploy::runner::{StepOutcome, run_step, run_to_end};
    use crate::core::deploy::WorkflowState;
    use crate::models::StepStatus;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn counter_target() -> DeployTarget {
        DeployTarget {
            contract: DetectedContract {
                name: "Counter".to_string(),
                path: "/src/counter.cairo".to_string(),
                constructor_args: vec![
                    ("initial_count".to_string(), "u128".to_string()),
                    ("owner".to_string(), "ContractAddress".to_string()),
                ],
            },
            source: crate::config::template::COUNTER_CAIRO.to_string(),
            network: Network::Sepolia,
            constructor_values: vec!["0".to_string(), "0x123".to_string()],
        }
    }

    #[tokio::test]
    async fn test_manual_deploy_one_step_per_call() {
        let host = RefCell::new(Deployment::new(DeployMode::Manual, counter_target(), 0));
        let delay = InstantDelay::default();
        let mut rng = StdRng::seed_from_u64(3);

        for expected in [25, 50, 75, 100] {
            assert_eq!(run_step(&host, &delay, &mut rng).await, StepOutcome::Succeeded);
            assert_eq!(host.borrow().workflow.progress(), expected);
        }
        let deployment = host.borrow();
        assert_eq!(deployment.workflow.state(), WorkflowState::Succeeded);
        assert_eq!(
            deployment.artifacts.class_hash.as_deref(),
            Some(class_hash(&deployment.target.source).as_str())
        );
        let address = deployment.artifacts.contract_address.as_ref().unwrap();
        assert!(address.starts_with("0x") && address.len() == 66);
        assert!(deployment.explorer_link().unwrap().starts_with("https://sepolia.starkscan.co/contract/0x"));
    }

    #[tokio::test]
    async fn test_smart_deploy_without_failures_succeeds() {
        let host = RefCell::new(
            Deployment::new(DeployMode::Smart, counter_target(), 0).with_failure_rate(0.0),
        );
        run_to_end(&host, &InstantDelay::default(), &mut StdRng::seed_from_u64(3)).await;

        let deployment = host.borrow();
        assert_eq!(deployment.workflow.progress(), 100);
        assert_eq!(deployment.workflow.steps().len(), 5);
        assert!(deployment.artifacts.deploy_tx.is_some());
    }

    #[tokio::test]
    async fn test_smart_deploy_always_failing_halts_at_analyze() {
        let host = RefCell::new(
            Deployment::new(DeployMode::Smart, counter_target(), 0).with_failure_rate(1.0),
        );
        run_to_end(&host, &InstantDelay::default(), &mut StdRng::seed_from_u64(3)).await;

        let deployment = host.borrow();
        let wf = &deployment.workflow;
        assert_eq!(wf.state(), WorkflowState::Failed);
        assert_eq!(wf.error().unwrap().code, "PARSE_ERROR");
        assert!(wf.steps().iter().all(|s| s.status == StepStatus::Error));
        assert_eq!(wf.progress(), 0);
    }

    #[tokio::test]
    async fn test_smart_deploy_terminates_for_any_seed() {
        for seed in 0..40 {
            let host = RefCell::new(Deployment::new(DeployMode::Smart, counter_target(), 0));
            run_to_end(&host, &InstantDelay::default(), &mut StdRng::seed_from_u64(seed)).await;

            let deployment = host.borrow();
            let wf = &deployment.workflow;
            assert!(wf.state().is_finished());
            assert!(wf.steps().iter().all(|s| matches!(s.status, StepStatus::Success | StepStatus::Error)));
            assert_eq!(wf.progress() == 100, wf.state() == WorkflowState::Succeeded);
            assert!(wf.steps().iter().all(|s| s.attempts <= MAX_ATTEMPTS));
        }
    }

    #[tokio::test]
    async fn test_retry_after_failure_completes_deployment() {
        let host = RefCell::new(
            Deployment::new(DeployMode::Smart, counter_target(), 0).with_failure_rate(1.0),
        );
        let delay = InstantDelay::default();
        let mut rng = StdRng::seed_from_u64(3);
        run_to_end(&host, &delay, &mut rng).await;
        assert_eq!(host.borrow().workflow.state(), WorkflowState::Failed);

        {
            let mut deployment = host.borrow_mut();
            deployment.failure_rate = 0.0;
            assert!(deployment.retry(1));
            assert!(!deployment.retry(1));
        }
        run_to_end(&host, &delay, &mut rng).await;

        let deployment = host.borrow();
        assert_eq!(deployment.workflow.state(), WorkflowState::Succeeded);
        assert!(deployment.workflow.error().is_none());
        assert!(deployment.artifacts.contract_address.is_some());
    }

    #[tokio::test]
    async fn test_manual_retry_keeps_earlier_artifacts() {
        let mut target = counter_target();
        target.source.clear();
        let host = RefCell::new(Deployment::new(DeployMode::Manual, target, 0));
        let delay = InstantDelay::default();
        let mut rng = StdRng::seed_from_u64(0);
        run_to_end(&host, &delay, &mut rng).await;

        let account = host.borrow().artifacts.account.clone();
        assert!(account.is_some());
        host.borrow_mut().target.source = "#[starknet::contract]\nmod Counter {}".to_string();
        assert!(host.borrow_mut().retry(1));

        assert_eq!(run_step(&host, &delay, &mut rng).await, StepOutcome::Succeeded);
        let deployment = host.borrow();
        assert_eq!(deployment.artifacts.account, account);
        assert_eq!(deployment.workflow.progress(), 50);
        assert_eq!(deployment.workflow.current_step().unwrap().id, "declare");
    }

    #[tokio::test]
    async fn test_missing_argument_fails_analysis() {
        let mut target = counter_target();
        target.constructor_values[1] = "  ".to_string();
        let host = RefCell::new(Deployment::new(DeployMode::Smart, target, 0).with_failure_rate(0.0));
        run_to_end(&host, &InstantDelay::default(), &mut StdRng::seed_from_u64(0)).await;

        let deployment = host.borrow();
        let err = deployment.workflow.error().unwrap();
        assert_eq!(err.step_id, "analyze");
        assert!(err.message.contains("owner"));
    }

    #[tokio::test]
    async fn test_empty_source_fails_compile_in_manual_mode() {
        let mut target = counter_target();
        target.source.clear();
        let host = RefCell::new(Deployment::new(DeployMode::Manual, target, 0));
        run_to_end(&host, &InstantDelay::default(), &mut StdRng::seed_from_u64(0)).await;

        let deployment = host.borrow();
        assert_eq!(deployment.workflow.error().unwrap().step_id, "compile");
        assert_eq!(deployment.workflow.progress(), 25);
    }
}
