//! Terminal sessions: scrollback, working directory, history and busy state.
//!
//! [`SessionManager`] owns every session and the command history all shells
//! share. Exactly one session is active at a time. A session running a
//! deferred command is busy and rejects input until the matching
//! [`PendingCommand`] is completed; other sessions are unaffected.

use std::collections::VecDeque;

use rand::Rng;

use super::commands::{Command, execute};
use super::mock_fs::display_path;
use crate::config::terminal::{MAX_COMMAND_HISTORY, MAX_SCROLLBACK, START_DIR, USER};
use crate::config::WELCOME_TEXT;
use crate::core::error::TerminalError;
use crate::models::{DeploymentLog, SessionKind, TerminalEntry};

/// Output of a running command, to be applied after `delay_ms`.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingCommand {
    pub session_id: usize,
    pub delay_ms: u32,
    pub entries: Vec<TerminalEntry>,
    /// Lines for the IDE log stream, posted on completion
    pub logs: Vec<DeploymentLog>,
}

/// One terminal tab.
#[derive(Clone, Debug)]
pub struct TerminalSession {
    pub id: usize,
    pub name: String,
    pub kind: SessionKind,
    pub entries: VecDeque<TerminalEntry>,
    /// Simulated working directory
    pub cwd: String,
    pub active: bool,
    /// A deferred command is in flight
    pub busy: bool,
    /// Number of log stream messages mirrored so far (log sessions only)
    mirrored: usize,
}

impl TerminalSession {
    fn new(id: usize, name: String, kind: SessionKind) -> Self {
        Self {
            id,
            name,
            kind,
            entries: VecDeque::new(),
            cwd: START_DIR.to_string(),
            active: false,
            busy: false,
            mirrored: 0,
        }
    }

    /// Prompt shown before input, e.g. `starknet-dev@cairo-ide:~/project`.
    pub fn prompt(&self) -> String {
        format!("{}@cairo-ide:{}", USER, display_path(&self.cwd))
    }

    /// Appends an entry, dropping the oldest past `MAX_SCROLLBACK`.
    pub fn push(&mut self, entry: TerminalEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > MAX_SCROLLBACK {
            self.entries.pop_front();
        }
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = TerminalEntry>) {
        for entry in entries {
            self.push(entry);
        }
    }

    fn mirror_logs(&mut self, messages: &[DeploymentLog]) {
        if messages.len() < self.mirrored {
            self.entries.clear();
            self.mirrored = 0;
        }
        for log in &messages[self.mirrored..] {
            self.push(TerminalEntry::log(
                format!("[{}] {}", log.level.label(), log.message),
                log.timestamp,
            ));
        }
        self.mirrored = messages.len();
    }
}

/// Input history shared by every shell session.
#[derive(Clone, Debug, Default)]
struct CommandHistory {
    lines: Vec<String>,
    index: Option<usize>,
}

impl CommandHistory {
    fn record(&mut self, line: &str) {
        self.lines.push(line.to_string());
        if self.lines.len() > MAX_COMMAND_HISTORY {
            self.lines.remove(0);
        }
        self.index = None;
    }

    /// Step back (ArrowUp). Clamps at the oldest entry.
    fn prev(&mut self) -> Option<String> {
        if self.lines.is_empty() {
            return None;
        }
        let index = match self.index {
            None => self.lines.len() - 1,
            Some(i) => i.saturating_sub(1),
        };
        self.index = Some(index);
        self.lines.get(index).cloned()
    }

    /// Step forward (ArrowDown). Past the newest entry yields `None`.
    fn next(&mut self) -> Option<String> {
        let next = self.index.map(|i| i + 1).filter(|&i| i < self.lines.len());
        self.index = next;
        next.and_then(|i| self.lines.get(i).cloned())
    }
}

/// All terminal sessions, the shared command history and id allocation.
#[derive(Clone, Debug)]
pub struct SessionManager {
    sessions: Vec<TerminalSession>,
    history: CommandHistory,
    next_id: usize,
}

impl SessionManager {
    /// Create a manager with an active shell and an empty log session.
    pub fn new(now: u64) -> Self {
        let mut manager = Self {
            sessions: Vec::new(),
            history: CommandHistory::default(),
            next_id: 1,
        };
        let id = manager.add_shell(now);
        manager.add_logs(&[]);
        manager.switch(id).ok();
        manager
    }

    pub fn sessions(&self) -> &[TerminalSession] {
        &self.sessions
    }

    pub fn get(&self, id: usize) -> Option<&TerminalSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    fn get_mut(&mut self, id: usize) -> Result<&mut TerminalSession, TerminalError> {
        self.sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(TerminalError::UnknownSession(id))
    }

    pub fn active(&self) -> Option<&TerminalSession> {
        self.sessions.iter().find(|s| s.active)
    }

    pub fn active_id(&self) -> Option<usize> {
        self.active().map(|s| s.id)
    }

    fn allocate_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Open a new shell session (not activated).
    pub fn add_shell(&mut self, now: u64) -> usize {
        let id = self.allocate_id();
        let shells = self.sessions.iter().filter(|s| s.kind == SessionKind::Shell).count();
        let name = if shells == 0 {
            "bash".to_string()
        } else {
            format!("bash ({})", shells + 1)
        };
        let mut session = TerminalSession::new(id, name, SessionKind::Shell);
        session.push(TerminalEntry::system(WELCOME_TEXT.trim_end(), now));
        self.sessions.push(session);
        id
    }

    /// Open a log view mirroring `messages` (not activated).
    pub fn add_logs(&mut self, messages: &[DeploymentLog]) -> usize {
        let id = self.allocate_id();
        let mut session = TerminalSession::new(id, "Logs".to_string(), SessionKind::Logs);
        session.mirror_logs(messages);
        self.sessions.push(session);
        id
    }

    /// Make `id` the active session.
    pub fn switch(&mut self, id: usize) -> Result<(), TerminalError> {
        self.get_mut(id)?;
        for session in &mut self.sessions {
            session.active = session.id == id;
        }
        Ok(())
    }

    /// Close a session. The last remaining session cannot be closed.
    ///
    /// Closing the active session activates the last one in the list.
    pub fn close(&mut self, id: usize) -> Result<(), TerminalError> {
        let index = self
            .sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or(TerminalError::UnknownSession(id))?;
        if self.sessions.len() == 1 {
            return Err(TerminalError::LastSession);
        }
        let closed = self.sessions.remove(index);
        if closed.active
            && let Some(last) = self.sessions.last_mut()
        {
            last.active = true;
        }
        Ok(())
    }

    /// Submit an input line to a shell session.
    ///
    /// Returns the pending output of a deferred command, which must be passed
    /// to [`complete`](Self::complete) once its delay has elapsed.
    pub fn submit<R: Rng + ?Sized>(
        &mut self,
        id: usize,
        line: &str,
        now: u64,
        rng: &mut R,
    ) -> Result<Option<PendingCommand>, TerminalError> {
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(TerminalError::UnknownSession(id))?;
        if session.kind == SessionKind::Logs {
            return Err(TerminalError::ReadOnlySession);
        }
        if session.busy {
            return Err(TerminalError::SessionBusy);
        }

        let line = line.trim();
        session.push(TerminalEntry::command(
            format!("{}$ {}", session.prompt(), line),
            now,
        ));
        let Some(cmd) = Command::parse_line(line) else {
            return Ok(None);
        };

        self.history.record(line);

        let outcome = execute(cmd, &session.cwd, now, rng);
        if outcome.clear {
            session.entries.clear();
        }
        if let Some(cwd) = outcome.cwd {
            session.cwd = cwd;
        }
        session.extend(outcome.output);

        Ok(outcome.deferred.map(|deferred| {
            session.busy = true;
            PendingCommand {
                session_id: id,
                delay_ms: deferred.delay_ms,
                entries: deferred.entries,
                logs: deferred.logs,
            }
        }))
    }

    /// Apply a finished command's output and release the session.
    ///
    /// Returns false if the session was closed in the meantime.
    pub fn complete(&mut self, pending: PendingCommand) -> bool {
        match self.get_mut(pending.session_id) {
            Ok(session) => {
                session.extend(pending.entries);
                session.busy = false;
                true
            }
            Err(_) => false,
        }
    }

    /// Commands entered in any shell, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history.lines
    }

    pub fn history_prev(&mut self) -> Option<String> {
        self.history.prev()
    }

    pub fn history_next(&mut self) -> Option<String> {
        self.history.next()
    }

    /// Wipe a session's scrollback.
    pub fn clear(&mut self, id: usize) -> Result<(), TerminalError> {
        self.get_mut(id)?.entries.clear();
        Ok(())
    }

    /// Bring every log session in line with the log stream.
    pub fn mirror_logs(&mut self, messages: &[DeploymentLog]) {
        for session in &mut self.sessions {
            if session.kind == SessionKind::Logs {
                session.mirror_logs(messages);
            }
        }
    }
}
