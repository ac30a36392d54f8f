//! Terminal-related data types for scrollback rendering.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Kind of terminal tab.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionKind {
    /// Interactive shell accepting command input
    Shell,
    /// Read-only mirror of the IDE log stream
    Logs,
}

/// Kind of a scrollback entry; drives the line color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// Echo of the submitted input line
    Command,
    /// Plain command output
    Output,
    /// Error output (red)
    Error,
    /// Messages from the terminal itself (welcome, busy notices)
    System,
    /// Mirrored IDE log message
    Log,
}

/// A single line of terminal scrollback with a unique ID.
#[derive(Clone, Debug)]
pub struct TerminalEntry {
    /// Unique ID for efficient keying in For loops
    pub id: usize,
    pub kind: EntryKind,
    pub text: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    pub exit_code: Option<i32>,
}

// Global counter for generating unique IDs
static TERMINAL_ENTRY_COUNTER: AtomicUsize = AtomicUsize::new(0);

impl TerminalEntry {
    fn new(kind: EntryKind, text: impl Into<String>, timestamp: u64) -> Self {
        Self {
            id: TERMINAL_ENTRY_COUNTER.fetch_add(1, Ordering::Relaxed),
            kind,
            text: text.into(),
            timestamp,
            exit_code: None,
        }
    }

    pub fn command(text: impl Into<String>, timestamp: u64) -> Self {
        Self::new(EntryKind::Command, text, timestamp)
    }

    pub fn output(text: impl Into<String>, timestamp: u64) -> Self {
        Self::new(EntryKind::Output, text, timestamp)
    }

    /// Error entry carrying a shell exit code.
    pub fn error(text: impl Into<String>, exit_code: i32, timestamp: u64) -> Self {
        Self {
            exit_code: Some(exit_code),
            ..Self::new(EntryKind::Error, text, timestamp)
        }
    }

    pub fn system(text: impl Into<String>, timestamp: u64) -> Self {
        Self::new(EntryKind::System, text, timestamp)
    }

    pub fn log(text: impl Into<String>, timestamp: u64) -> Self {
        Self::new(EntryKind::Log, text, timestamp)
    }
}

impl PartialEq for TerminalEntry {
    fn eq(&self, other: &Self) -> bool {
        // Only compare data, not ID
        self.kind == other.kind
            && self.text == other.text
            && self.timestamp == other.timestamp
            && self.exit_code == other.exit_code
    }
}
