//! Custom error types for the application.
//!
//! Each domain gets its own enum:
//!
//! - [`FileTreeError`] - project tree mutations
//! - [`TerminalError`] - session management and input submission
//! - [`StorageError`] - localStorage snapshot persistence
//! - [`ImportError`] - local project import

use thiserror::Error;

/// Errors from mutating the in-memory project tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileTreeError {
    #[error("no such file or directory: {0}")]
    NotFound(String),
    #[error("not a directory: {0}")]
    NotAFolder(String),
    #[error("not a file: {0}")]
    NotAFile(String),
    #[error("'{0}' already exists")]
    AlreadyExists(String),
    #[error("invalid name '{0}'")]
    InvalidName(String),
}

/// Errors from the terminal session engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TerminalError {
    #[error("no terminal session with id {0}")]
    UnknownSession(usize),
    #[error("a command is still running in this session")]
    SessionBusy,
    #[error("log sessions are read-only")]
    ReadOnlySession,
    #[error("cannot close the last terminal session")]
    LastSession,
}

/// Errors from reading or writing the persisted snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("localStorage not available")]
    Unavailable,
    #[error("malformed snapshot: {0}")]
    Malformed(String),
    #[error("failed to serialize snapshot: {0}")]
    SerializationFailed(String),
    #[error("failed to write to localStorage")]
    WriteFailed,
}

/// Errors from the project import dialog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("no importable files were selected")]
    NoFiles,
    #[error("pick and analyse a project before importing")]
    NotReady,
}
