//! Data models and types for the application.
//!
//! Contains domain types for:
//! - [`FileNode`], [`NodeKind`] - In-memory project tree
//! - [`EditorTab`], [`ActivePanel`] - Editor and layout state
//! - [`TerminalEntry`], [`EntryKind`], [`SessionKind`] - Terminal scrollback
//! - [`DeploymentStep`], [`DetectedContract`], [`DeploymentError`], [`DeploymentLog`] - Workflow records

mod deploy;
mod editor;
mod file;
mod terminal;

pub use deploy::{
    DeploymentError, DeploymentLog, DeploymentStep, DetectedContract, LogLevel, Network, Severity,
    StepStatus,
};
pub use editor::{ActivePanel, EditorTab};
pub use file::{FileNode, NodeKind, join_path, parent_path};
pub use terminal::{EntryKind, SessionKind, TerminalEntry};
