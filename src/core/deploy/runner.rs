//! Async drivers for step workflows.
//!
//! The drivers never hold a borrow across an `.await`: every state change goes
//! through [`Host::visit`], so the same code runs against a Leptos signal in the
//! browser and a `RefCell` under `tokio` in tests.

use std::cell::RefCell;
use std::future::Future;

use rand::{Rng, RngCore};

use super::Workflow;
use crate::config::deploy::RETRY_BACKOFF_MS;
use crate::models::DeploymentError;

/// Clock and sleep source.
pub trait Delay {
    /// Milliseconds since the Unix epoch.
    fn now(&self) -> u64;
    fn sleep(&self, ms: u32) -> impl Future<Output = ()>;
}

/// Something that owns a workflow together with the data its steps produce.
pub trait Simulation {
    fn workflow(&self) -> &Workflow;
    fn workflow_mut(&mut self) -> &mut Workflow;

    /// Time a step spends loading before its outcome is decided.
    fn step_delay(&self) -> u32;

    /// Attempts allowed per step, first one included.
    fn max_attempts(&self) -> u32 {
        1
    }

    /// Decide one attempt of `step_id`. `Ok` carries the detail line.
    fn attempt(
        &mut self,
        step_id: &'static str,
        rng: &mut dyn RngCore,
    ) -> Result<String, DeploymentError>;
}

/// Shared cell the drivers mutate between awaits.
pub trait Host<S> {
    /// Run `f` on the simulation; `None` once it has been dropped.
    fn visit<T>(&self, f: impl FnOnce(&mut S) -> T) -> Option<T>;
}

impl<S> Host<S> for RefCell<S> {
    fn visit<T>(&self, f: impl FnOnce(&mut S) -> T) -> Option<T> {
        Some(f(&mut self.borrow_mut()))
    }
}

/// Outcome of a single driven step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Succeeded,
    Retrying,
    Failed,
    /// Workflow already finished or host gone
    Stopped,
}

/// Drive one attempt of the current step.
pub async fn run_step<S, H, D, R>(host: &H, delay: &D, rng: &mut R) -> StepOutcome
where
    S: Simulation,
    H: Host<S>,
    D: Delay,
    R: Rng,
{
    let started = host.visit(|sim| {
        let wait = sim.step_delay();
        sim.workflow_mut()
            .begin_step(delay.now())
            .map(|id| (id, wait))
    });
    let Some(Some((step_id, wait))) = started else {
        return StepOutcome::Stopped;
    };

    delay.sleep(wait).await;

    let Some(result) = host.visit(|sim| {
        let attempts = sim
            .workflow()
            .current_step()
            .map_or(1, |step| step.attempts);
        (sim.attempt(step_id, &mut *rng), attempts, sim.max_attempts())
    }) else {
        return StepOutcome::Stopped;
    };

    let now = delay.now();
    match result {
        (Ok(detail), _, _) => {
            host.visit(|sim| sim.workflow_mut().succeed_step(now, detail));
            StepOutcome::Succeeded
        }
        (Err(err), attempts, max) if err.retryable && attempts < max => {
            let backoff = attempts * RETRY_BACKOFF_MS;
            host.visit(|sim| sim.workflow_mut().note_retry(now, &err, backoff));
            delay.sleep(backoff).await;
            StepOutcome::Retrying
        }
        (Err(err), _, _) => {
            host.visit(|sim| sim.workflow_mut().fail_step(now, err));
            StepOutcome::Failed
        }
    }
}

/// Drive every remaining step until the workflow finishes.
pub async fn run_to_end<S, H, D, R>(host: &H, delay: &D, rng: &mut R)
where
    S: Simulation,
    H: Host<S>,
    D: Delay,
    R: Rng,
{
    loop {
        match run_step(host, delay, rng).await {
            StepOutcome::Succeeded | StepOutcome::Retrying => continue,
            StepOutcome::Failed | StepOutcome::Stopped => break,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::Cell;

    use super::Delay;

    /// Delay that never waits and advances a fake clock instead.
    #[derive(Default)]
    pub struct InstantDelay {
        pub clock: Cell<u64>,
        pub slept: Cell<u64>,
    }

    impl Delay for InstantDelay {
        fn now(&self) -> u64 {
            self.clock.get()
        }

        async fn sleep(&self, ms: u32) {
            self.clock.set(self.clock.get() + u64::from(ms));
            self.slept.set(self.slept.get() + u64::from(ms));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::InstantDelay;
    use super::*;
    use crate::core::deploy::WorkflowState;
    use crate::models::{Severity, StepStatus};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Fails a scripted number of attempts per step.
    struct Scripted {
        workflow: Workflow,
        failures: Vec<(&'static str, u32, bool)>,
        max_attempts: u32,
    }

    impl Scripted {
        fn new(failures: Vec<(&'static str, u32, bool)>, max_attempts: u32) -> Self {
            Self {
                workflow: Workflow::new(&[("one", "One"), ("two", "Two"), ("three", "Three")]),
                failures,
                max_attempts,
            }
        }
    }

    impl Simulation for Scripted {
        fn workflow(&self) -> &Workflow {
            &self.workflow
        }

        fn workflow_mut(&mut self) -> &mut Workflow {
            &mut self.workflow
        }

        fn step_delay(&self) -> u32 {
            100
        }

        fn max_attempts(&self) -> u32 {
            self.max_attempts
        }

        fn attempt(
            &mut self,
            step_id: &'static str,
            _rng: &mut dyn RngCore,
        ) -> Result<String, DeploymentError> {
            let Some(entry) = self.failures.iter_mut().find(|(id, n, _)| *id == step_id && *n > 0)
            else {
                return Ok(format!("{step_id} done"));
            };
            entry.1 -= 1;
            Err(DeploymentError {
                step_id,
                code: "FLAKY",
                message: "flaky".to_string(),
                suggestion: "",
                severity: Severity::Medium,
                retryable: entry.2,
            })
        }
    }

    #[tokio::test]
    async fn test_runs_to_success() {
        let host = RefCell::new(Scripted::new(vec![], 3));
        let delay = InstantDelay::default();
        run_to_end(&host, &delay, &mut StdRng::seed_from_u64(0)).await;

        let sim = host.borrow();
        assert_eq!(sim.workflow.state(), WorkflowState::Succeeded);
        assert_eq!(sim.workflow.progress(), 100);
        assert_eq!(delay.slept.get(), 300);
    }

    #[tokio::test]
    async fn test_retry_then_success_with_linear_backoff() {
        let host = RefCell::new(Scripted::new(vec![("two", 2, true)], 3));
        let delay = InstantDelay::default();
        run_to_end(&host, &delay, &mut StdRng::seed_from_u64(0)).await;

        let sim = host.borrow();
        assert_eq!(sim.workflow.state(), WorkflowState::Succeeded);
        assert_eq!(sim.workflow.steps()[1].attempts, 3);
        // five step waits plus 1s and 2s of backoff
        assert_eq!(delay.slept.get(), 500 + 1000 + 2000);
    }

    #[tokio::test]
    async fn test_retry_exhaustion_halts() {
        let host = RefCell::new(Scripted::new(vec![("two", 3, true)], 3));
        let delay = InstantDelay::default();
        run_to_end(&host, &delay, &mut StdRng::seed_from_u64(0)).await;

        let sim = host.borrow();
        assert_eq!(sim.workflow.state(), WorkflowState::Failed);
        assert_eq!(sim.workflow.steps()[1].attempts, 3);
        assert_eq!(sim.workflow.steps()[2].status, StepStatus::Error);
        assert_eq!(sim.workflow.steps()[2].detail.as_deref(), Some("skipped"));
        assert!(sim.workflow.progress() < 100);
    }

    #[tokio::test]
    async fn test_non_retryable_halts_immediately() {
        let host = RefCell::new(Scripted::new(vec![("one", 1, false)], 3));
        let delay = InstantDelay::default();
        run_to_end(&host, &delay, &mut StdRng::seed_from_u64(0)).await;

        let sim = host.borrow();
        assert_eq!(sim.workflow.state(), WorkflowState::Failed);
        assert_eq!(sim.workflow.steps()[0].attempts, 1);
        assert_eq!(sim.workflow.error().unwrap().code, "FLAKY");
    }

    #[tokio::test]
    async fn test_single_step_driving() {
        let host = RefCell::new(Scripted::new(vec![], 1));
        let delay = InstantDelay::default();
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(run_step(&host, &delay, &mut rng).await, StepOutcome::Succeeded);
        assert_eq!(host.borrow().workflow.progress(), 33);
        run_step(&host, &delay, &mut rng).await;
        run_step(&host, &delay, &mut rng).await;
        assert_eq!(run_step(&host, &delay, &mut rng).await, StepOutcome::Stopped);
    }
}
