//! Ordered multi-step workflow state machine.
//!
//! Shared by the manual and smart deployment simulators. Steps move
//! `Pending -> Loading -> Success | Error`; the workflow itself is finished
//! once every step is terminal.

use crate::models::{DeploymentError, DeploymentLog, DeploymentStep, LogLevel, StepStatus};
use crate::utils::format::format_timestamp;

/// Overall workflow state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WorkflowState {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl WorkflowState {
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Steps, log and failure of one workflow run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Workflow {
    steps: Vec<DeploymentStep>,
    current: usize,
    state: WorkflowState,
    logs: Vec<DeploymentLog>,
    error: Option<DeploymentError>,
}

impl Workflow {
    /// Build a workflow from `(id, label)` pairs.
    pub fn new(steps: &[(&'static str, &'static str)]) -> Self {
        Self {
            steps: steps
                .iter()
                .map(|&(id, label)| DeploymentStep::new(id, label))
                .collect(),
            ..Self::default()
        }
    }

    pub fn steps(&self) -> &[DeploymentStep] {
        &self.steps
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn logs(&self) -> &[DeploymentLog] {
        &self.logs
    }

    pub fn error(&self) -> Option<&DeploymentError> {
        self.error.as_ref()
    }

    /// The step currently loading or next to run.
    pub fn current_step(&self) -> Option<&DeploymentStep> {
        if self.state.is_finished() {
            return None;
        }
        self.steps.get(self.current)
    }

    /// Completion percentage. Exactly 100 only after every step succeeded.
    pub fn progress(&self) -> u32 {
        if self.state == WorkflowState::Succeeded {
            return 100;
        }
        if self.steps.is_empty() {
            return 0;
        }
        let done = self
            .steps
            .iter()
            .filter(|s| s.status == StepStatus::Success)
            .count();
        (done * 100 / self.steps.len()) as u32
    }

    /// Append a log line.
    pub fn log(&mut self, now: u64, level: LogLevel, message: impl Into<String>) {
        self.logs.push(DeploymentLog {
            timestamp: now,
            level,
            message: message.into(),
        });
    }

    /// Move the current step to `Loading`, returning its id.
    ///
    /// Calling this again while the step is loading counts as a retry.
    /// Returns `None` once the workflow is finished.
    pub fn begin_step(&mut self, now: u64) -> Option<&'static str> {
        if self.state.is_finished() {
            return None;
        }
        self.state = WorkflowState::Running;
        let step = self.steps.get_mut(self.current)?;
        step.status = StepStatus::Loading;
        step.attempts += 1;
        let (id, label, attempts) = (step.id, step.label, step.attempts);
        if attempts == 1 {
            self.log(now, LogLevel::Info, format!("{}...", label));
        } else {
            self.log(
                now,
                LogLevel::Info,
                format!("{} (attempt {})...", label, attempts),
            );
        }
        Some(id)
    }

    /// Mark the current step successful and advance.
    pub fn succeed_step(&mut self, now: u64, detail: impl Into<String>) {
        let Some(step) = self.steps.get_mut(self.current) else {
            return;
        };
        let detail = detail.into();
        step.status = StepStatus::Success;
        step.detail = Some(detail.clone());
        let label = step.label;
        self.log(now, LogLevel::Success, format!("{}: {}", label, detail));

        self.current += 1;
        if self.current == self.steps.len() {
            self.state = WorkflowState::Succeeded;
        }
    }

    /// Record a failed attempt that will be retried after `backoff_ms`.
    pub fn note_retry(&mut self, now: u64, error: &DeploymentError, backoff_ms: u32) {
        if let Some(step) = self.steps.get_mut(self.current) {
            step.detail = Some(error.message.clone());
        }
        self.log(
            now,
            LogLevel::Warn,
            format!("{}; retrying in {:.1}s", error, f64::from(backoff_ms) / 1000.0),
        );
    }

    /// Halt the workflow on `error`.
    ///
    /// The current step becomes `Error`, and so does every step after it.
    pub fn fail_step(&mut self, now: u64, error: DeploymentError) {
        let current = self.current;
        for (i, step) in self.steps.iter_mut().enumerate().skip(current) {
            step.status = StepStatus::Error;
            step.detail = Some(if i == current {
                error.message.clone()
            } else {
                "skipped".to_string()
            });
        }
        self.log(now, LogLevel::Error, error.to_string());
        self.state = WorkflowState::Failed;
        self.error = Some(error);
    }

    /// Reopen a failed workflow at the step that failed.
    ///
    /// The failed step and every step skipped after it go back to `Pending`
    /// with their attempt counts cleared. Returns false unless the workflow
    /// had failed.
    pub fn retry_failed(&mut self, now: u64) -> bool {
        if self.state != WorkflowState::Failed {
            return false;
        }
        for step in self.steps.iter_mut().skip(self.current) {
            step.status = StepStatus::Pending;
            step.detail = None;
            step.attempts = 0;
        }
        self.error = None;
        self.state = if self.current == 0 {
            WorkflowState::Idle
        } else {
            WorkflowState::Running
        };
        if let Some(step) = self.steps.get(self.current) {
            let label = step.label;
            self.log(now, LogLevel::Info, format!("Retrying from {}", label));
        }
        true
    }

    /// Plain-text log for download.
    pub fn export_logs(&self) -> String {
        self.logs
            .iter()
            .map(|log| {
                format!(
                    "[{}] {:<5} {}",
                    format_timestamp(log.timestamp),
                    log.level.label(),
                    log.message
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    const STEPS: &[(&str, &str)] = &[("a", "Step A"), ("b", "Step B"), ("c", "Step C"), ("d", "Step D")];

    fn error(step_id: &'static str) -> DeploymentError {
        DeploymentError {
            step_id,
            code: "BOOM",
            message: "it broke".to_string(),
            suggestion: "",
            severity: Severity::High,
            retryable: false,
        }
    }

    #[test]
    fn test_full_success() {
        let mut wf = Workflow::new(STEPS);
        assert_eq!(wf.state(), WorkflowState::Idle);
        let mut seen = Vec::new();
        while let Some(id) = wf.begin_step(0) {
            assert_eq!(wf.current_step().map(|s| s.status), Some(StepStatus::Loading));
            assert!(wf.progress() < 100);
            seen.push(id);
            wf.succeed_step(0, "ok");
        }
        assert_eq!(seen, ["a", "b", "c", "d"]);
        assert_eq!(wf.state(), WorkflowState::Succeeded);
        assert_eq!(wf.progress(), 100);
        assert!(wf.steps().iter().all(|s| s.status == StepStatus::Success));
        assert!(wf.current_step().is_none());
    }

    #[test]
    fn test_progress_steps() {
        let mut wf = Workflow::new(STEPS);
        assert_eq!(wf.progress(), 0);
        wf.begin_step(0);
        wf.succeed_step(0, "ok");
        assert_eq!(wf.progress(), 25);
        wf.begin_step(0);
        wf.succeed_step(0, "ok");
        assert_eq!(wf.progress(), 50);
    }

    #[test]
    fn test_failure_marks_remaining_steps() {
        let mut wf = Workflow::new(STEPS);
        wf.begin_step(0);
        wf.succeed_step(0, "ok");
        wf.begin_step(0);
        wf.fail_step(0, error("b"));

        assert_eq!(wf.state(), WorkflowState::Failed);
        assert!(wf.steps().iter().all(|s| matches!(s.status, StepStatus::Success | StepStatus::Error)));
        assert_eq!(wf.steps()[1].detail.as_deref(), Some("it broke"));
        assert_eq!(wf.steps()[3].detail.as_deref(), Some("skipped"));
        assert_eq!(wf.progress(), 25);
        assert_eq!(wf.error().unwrap().step_id, "b");
        assert_eq!(wf.begin_step(0), None);
    }

    #[test]
    fn test_failure_on_last_step_is_below_100() {
        let mut wf = Workflow::new(STEPS);
        for _ in 0..3 {
            wf.begin_step(0);
            wf.succeed_step(0, "ok");
        }
        wf.begin_step(0);
        wf.fail_step(0, error("d"));
        assert_eq!(wf.progress(), 75);
    }

    #[test]
    fn test_retry_counts_attempts() {
        let mut wf = Workflow::new(STEPS);
        wf.begin_step(0);
        wf.note_retry(0, &error("a"), 1000);
        assert_eq!(wf.begin_step(0), Some("a"));
        assert_eq!(wf.steps()[0].attempts, 2);
        assert_eq!(wf.logs()[1].level, LogLevel::Warn);
        assert_eq!(wf.logs()[2].message, "Step A (attempt 2)...");
    }

    #[test]
    fn test_retry_failed_resumes_at_failed_step() {
        let mut wf = Workflow::new(STEPS);
        wf.begin_step(0);
        wf.succeed_step(0, "ok");
        wf.begin_step(0);
        wf.fail_step(0, error("b"));

        assert!(wf.retry_failed(5));
        assert_eq!(wf.state(), WorkflowState::Running);
        assert!(wf.error().is_none());
        let statuses: Vec<_> = wf.steps().iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            [StepStatus::Success, StepStatus::Pending, StepStatus::Pending, StepStatus::Pending]
        );
        assert!(wf.steps()[1..].iter().all(|s| s.detail.is_none() && s.attempts == 0));
        assert_eq!(wf.logs().last().unwrap().message, "Retrying from Step B");
        assert_eq!(wf.progress(), 25);

        assert_eq!(wf.begin_step(6), Some("b"));
        assert_eq!(wf.steps()[1].attempts, 1);
        for _ in 0..3 {
            wf.succeed_step(7, "ok");
            wf.begin_step(7);
        }
        assert_eq!(wf.state(), WorkflowState::Succeeded);
    }

    #[test]
    fn test_retry_failed_on_first_step_is_idle() {
        let mut wf = Workflow::new(STEPS);
        wf.begin_step(0);
        wf.fail_step(0, error("a"));
        assert!(wf.retry_failed(0));
        assert_eq!(wf.state(), WorkflowState::Idle);
        assert_eq!(wf.current_step().unwrap().id, "a");
    }

    #[test]
    fn test_retry_failed_needs_failure() {
        let mut wf = Workflow::new(STEPS);
        assert!(!wf.retry_failed(0));
        wf.begin_step(0);
        assert!(!wf.retry_failed(0));
        assert_eq!(wf.steps()[0].status, StepStatus::Loading);
    }

    #[test]
    fn test_export_logs() {
        let mut wf = Workflow::new(STEPS);
        wf.begin_step(0);
        wf.succeed_step(2_000, "done");
        let text = wf.export_logs();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "[1970-01-01 00:00:00 UTC] INFO  Step A...");
        assert_eq!(lines[1], "[1970-01-01 00:00:02 UTC] OK    Step A: done");
    }
}
