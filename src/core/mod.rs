//! Core business logic for the IDE.
//!
//! This module provides:
//! - [`file_tree`], [`tabs`] and [`Workspace`] for project files and editor tabs
//! - [`terminal`] sessions, commands and completion
//! - [`deploy`] workflows and the local project [`import`]
//! - [`Snapshot`] persistence format

pub mod compile;
pub mod deploy;
pub mod error;
pub mod file_tree;
pub mod import;
pub mod random;
mod snapshot;
pub mod tabs;
pub mod terminal;
mod workspace;

pub use snapshot::{Snapshot, clamp_sidebar_width};
pub use workspace::Workspace;
