//! Simulated deployment workflows.
//!
//! - [`workflow`] - step state machine and log
//! - [`steps`] - manual and smart step tables, fabricated results
//! - [`scenarios`] - injected failure table
//! - [`detect`] - contract and constructor detection
//! - [`runner`] - async drivers with retry and backoff
//! - [`report`] - JSON error report for failed runs

pub mod detect;
mod report;
pub mod runner;
pub mod scenarios;
mod steps;
mod workflow;

pub use detect::detect_contracts;
pub use runner::{Delay, Host, Simulation, StepOutcome, run_step, run_to_end};
pub use steps::{DeployArtifacts, DeployMode, DeployTarget, Deployment, MANUAL_STEPS, SMART_STEPS};
pub use workflow::{Workflow, WorkflowState};
