//! UI components built with Leptos.
//!
//! - [`Ide`] - Top-level layout (main entry point)
//! - [`dialogs`] - Deployment and import workflow dialogs
//! - [`editor`] - Tabbed text editor
//! - [`icons`] - Centralized icon definitions (change theme here)
//! - [`sidebar`] - Explorer, search, and deploy panels
//! - [`status`] - Status bar showing file, package, and network info
//! - [`terminal`] - Terminal sessions

pub mod dialogs;
pub mod editor;
mod ide;
pub mod icons;
pub mod sidebar;
pub mod status;
pub mod terminal;

pub use ide::Ide;
