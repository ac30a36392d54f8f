//! Browser-facing helpers and display formatting.
//!
//! Provides:
//! - [`dom`] - window, localStorage, clipboard and focus access
//! - [`storage`] - snapshot load/save under the app's storage key
//! - [`log`] - console logging
//! - [`timer`] - [`BrowserDelay`] for the workflow drivers
//! - [`download_text`], [`download_json`] - Blob-backed downloads
//! - [`upload`] - reading picked or dropped files for the import
//! - [`format`] - timestamp and size formatting

pub mod dom;
mod download;
pub mod format;
pub mod log;
pub mod storage;
pub mod timer;
pub mod upload;

pub use download::{download_json, download_text};
pub use timer::BrowserDelay;
