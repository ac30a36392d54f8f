//! Terminal session engine.
//!
//! - [`commands`] - flat command dispatch producing [`CommandOutcome`]s
//! - [`mock_fs`] - the hardcoded directory map commands navigate
//! - [`session`] - sessions, history and deferred-command bookkeeping
//! - [`autocomplete`] - Tab completion against the command list

mod autocomplete;
pub mod commands;
pub mod mock_fs;
mod session;

pub use autocomplete::{AutocompleteResult, autocomplete, get_hint};
pub use commands::{Command, CommandOutcome};
pub use session::{PendingCommand, SessionManager, TerminalSession};
