//! Records describing a simulated deployment workflow.
//!
//! None of these outlive the dialog that created them.

use std::fmt;

/// Lifecycle of a single workflow step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StepStatus {
    #[default]
    Pending,
    Loading,
    Success,
    Error,
}

/// One named stage of a workflow.
#[derive(Clone, Debug, PartialEq)]
pub struct DeploymentStep {
    /// Stable identifier, e.g. `declare`
    pub id: &'static str,
    /// Human readable label
    pub label: &'static str,
    pub status: StepStatus,
    /// Result or failure text shown under the label
    pub detail: Option<String>,
    /// Number of attempts started for this step
    pub attempts: u32,
}

impl DeploymentStep {
    pub fn new(id: &'static str, label: &'static str) -> Self {
        Self {
            id,
            label,
            status: StepStatus::Pending,
            detail: None,
            attempts: 0,
        }
    }
}

/// A contract found in project sources.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetectedContract {
    /// Name of the `mod` carrying the contract attribute
    pub name: String,
    /// Path of the file the contract lives in
    pub path: String,
    /// Constructor parameters as `name: Type` pairs
    pub constructor_args: Vec<(String, String)>,
}

/// A synthetic step failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentError {
    pub step_id: &'static str,
    /// Short machine-ish code, e.g. `NETWORK_TIMEOUT`
    pub code: &'static str,
    pub message: String,
    pub suggestion: &'static str,
    pub severity: Severity,
    /// Whether the smart deployer may retry the step on its own
    pub retryable: bool,
}

/// How bad a step failure is, for the error report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for DeploymentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Severity of a workflow log line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warn,
    Error,
}

impl LogLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Success => "OK",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

/// A timestamped workflow log line.
#[derive(Clone, Debug, PartialEq)]
pub struct DeploymentLog {
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    pub level: LogLevel,
    pub message: String,
}

/// Target network of a simulated deployment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Network {
    Devnet,
    #[default]
    Sepolia,
    Mainnet,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Devnet, Network::Sepolia, Network::Mainnet];

    pub fn name(self) -> &'static str {
        match self {
            Self::Devnet => "Devnet",
            Self::Sepolia => "Sepolia",
            Self::Mainnet => "Mainnet",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.name().eq_ignore_ascii_case(name))
    }

    /// Block explorer base used for display links.
    pub fn explorer_url(self) -> &'static str {
        match self {
            Self::Devnet => "http://localhost:5050",
            Self::Sepolia => "https://sepolia.starkscan.co",
            Self::Mainnet => "https://starkscan.co",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_lookup() {
        assert_eq!(Network::from_name("sepolia"), Some(Network::Sepolia));
        assert_eq!(Network::from_name("MAINNET"), Some(Network::Mainnet));
        assert_eq!(Network::from_name("goerli"), None);
    }

    #[test]
    fn test_error_display() {
        let err = DeploymentError {
            step_id: "declare",
            code: "NETWORK_TIMEOUT",
            message: "Sequencer did not respond".to_string(),
            suggestion: "",
            severity: Severity::Medium,
            retryable: true,
        };
        assert_eq!(err.to_string(), "[NETWORK_TIMEOUT] Sequencer did not respond");
    }
}
