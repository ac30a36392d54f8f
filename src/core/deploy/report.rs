//! Error report for a failed deployment, exported as JSON.

use serde::Serialize;

use super::Deployment;
use crate::core::random::short_hex;
use crate::models::StepStatus;
use crate::utils::format::format_timestamp;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub generated_at: String,
    pub contract: String,
    pub path: String,
    pub network: &'static str,
    pub mode: &'static str,
    pub error: Option<ReportedError>,
    pub steps: Vec<ReportedStep>,
    pub logs: Vec<ReportedLog>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedError {
    pub step: &'static str,
    pub code: &'static str,
    pub severity: &'static str,
    pub message: String,
    pub suggested_fix: &'static str,
    pub retryable: bool,
    pub technical_details: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportedStep {
    pub id: &'static str,
    pub label: &'static str,
    pub status: &'static str,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportedLog {
    pub timestamp: String,
    pub level: &'static str,
    pub message: String,
}

fn status_label(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Pending => "pending",
        StepStatus::Loading => "loading",
        StepStatus::Success => "success",
        StepStatus::Error => "error",
    }
}

impl Deployment {
    /// Key/value lines describing the failure, for copying into a bug report.
    pub fn technical_details(&self) -> Option<String> {
        let error = self.workflow.error()?;
        let step = self.workflow.steps().iter().find(|s| s.id == error.step_id);
        let mut lines = vec![
            format!(
                "step: {} ({})",
                error.step_id,
                step.map_or("unknown", |s| s.label)
            ),
            format!("code: {}", error.code),
            format!("severity: {}", error.severity.label()),
            format!("attempts: {}", step.map_or(0, |s| s.attempts)),
            format!("mode: {}", self.mode.label()),
            format!("network: {}", self.target.network.name()),
            format!(
                "contract: {} ({})",
                self.target.contract.name, self.target.contract.path
            ),
        ];
        if let Some(hash) = &self.artifacts.class_hash {
            lines.push(format!("class hash: {}", short_hex(hash)));
        }
        Some(lines.join("\n"))
    }

    pub fn error_report(&self, now: u64) -> ErrorReport {
        let error = self.workflow.error().map(|e| ReportedError {
            step: e.step_id,
            code: e.code,
            severity: e.severity.label(),
            message: e.message.clone(),
            suggested_fix: e.suggestion,
            retryable: e.retryable,
            technical_details: self.technical_details().unwrap_or_default(),
        });
        ErrorReport {
            generated_at: format_timestamp(now),
            contract: self.target.contract.name.clone(),
            path: self.target.contract.path.clone(),
            network: self.target.network.name(),
            mode: self.mode.label(),
            error,
            steps: self
                .workflow
                .steps()
                .iter()
                .map(|s| ReportedStep {
                    id: s.id,
                    label: s.label,
                    status: status_label(s.status),
                    attempts: s.attempts,
                    detail: s.detail.clone(),
                })
                .collect(),
            logs: self
                .workflow
                .logs()
                .iter()
                .map(|l| ReportedLog {
                    timestamp: format_timestamp(l.timestamp),
                    level: l.level.label(),
                    message: l.message.clone(),
                })
                .collect(),
        }
    }

    /// Pretty-printed [`ErrorReport`].
    pub fn error_report_json(&self, now: u64) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.error_report(now))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::core::deploy::runner::testing::InstantDelay;
    use crate::core::deploy::{DeployMode, DeployTarget, run_to_end};
    use crate::models::{DetectedContract, Network};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn empty_target() -> DeployTarget {
        DeployTarget {
            contract: DetectedContract {
                name: "Vault".to_string(),
                path: "/src/vault.cairo".to_string(),
                constructor_args: vec![],
            },
            source: String::new(),
            network: Network::Devnet,
            constructor_values: vec![],
        }
    }

    async fn failed_manual_deploy() -> Deployment {
        let host = RefCell::new(Deployment::new(DeployMode::Manual, empty_target(), 0));
        run_to_end(&host, &InstantDelay::default(), &mut StdRng::seed_from_u64(1)).await;
        host.into_inner()
    }

    #[tokio::test]
    async fn test_technical_details() {
        let deployment = failed_manual_deploy().await;
        let details = deployment.technical_details().unwrap();
        let lines: Vec<_> = details.lines().collect();
        assert_eq!(lines[0], "step: compile (Compile contract)");
        assert_eq!(lines[1], "code: COMPILATION_FAILED");
        assert_eq!(lines[2], "severity: high");
        assert_eq!(lines[3], "attempts: 1");
        assert!(lines.contains(&"network: Devnet"));
        assert!(lines.contains(&"contract: Vault (/src/vault.cairo)"));
    }

    #[tokio::test]
    async fn test_error_report_json() {
        let deployment = failed_manual_deploy().await;
        let json = deployment.error_report_json(0).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["generatedAt"], "1970-01-01 00:00:00 UTC");
        assert_eq!(value["mode"], "manual");
        assert_eq!(value["error"]["code"], "COMPILATION_FAILED");
        assert_eq!(value["error"]["severity"], "high");
        assert_eq!(value["error"]["suggestedFix"], "Add the contract source and save the file.");
        assert_eq!(value["steps"][0]["status"], "success");
        assert_eq!(value["steps"][1]["status"], "error");
        assert_eq!(value["steps"][3]["detail"], "skipped");
        assert_eq!(value["logs"].as_array().unwrap().len(), deployment.workflow.logs().len());
    }

    #[test]
    fn test_report_without_failure() {
        let deployment = Deployment::new(DeployMode::Smart, empty_target(), 0);
        assert!(deployment.technical_details().is_none());
        let report = deployment.error_report(0);
        assert!(report.error.is_none());
        assert!(report.steps.iter().all(|s| s.status == "pending" && s.detail.is_none()));
    }
}
