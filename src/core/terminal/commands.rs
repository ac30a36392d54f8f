//! Command parsing and execution.
//!
//! Input lines are split on whitespace and dispatched on the first word.
//! Execution never touches session state directly; it returns a
//! [`CommandOutcome`] the session applies.

use rand::Rng;

use super::mock_fs;
use crate::config::terminal::{EXIT_FAILURE, EXIT_NOT_FOUND, HOME, START_DIR, USER, delays};
use crate::config::HELP_TEXT;
use crate::core::random::{class_hash, random_felt};
use crate::models::{DeploymentLog, LogLevel, TerminalEntry};
use crate::utils::format::format_timestamp;

/// Package the mock project builds as.
const PACKAGE: &str = "hello_starknet";

// =============================================================================
// Command Enum
// =============================================================================

/// Parsed terminal command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Ls(Option<String>),
    Cd(Option<String>),
    Pwd,
    Cat(Option<String>),
    Clear,
    ScarbBuild,
    ScarbTest,
    /// `scarb` with a missing or unsupported subcommand
    ScarbUsage(Option<String>),
    StarknetDeploy,
    /// `starknet` with a missing or unsupported subcommand
    StarknetUsage(Option<String>),
    CairoCompile(Option<String>),
    Tree(Option<String>),
    Whoami,
    Date,
    Echo(String),
    Unknown(String),
}

impl Command {
    /// Parse command from name and arguments.
    ///
    /// Names are matched case-insensitively; arguments keep their case.
    pub fn parse(name: &str, args: &[&str]) -> Self {
        let first = args.first().map(|s| s.to_string());
        match name.to_lowercase().as_str() {
            "help" => Self::Help,
            "ls" => Self::Ls(first),
            "cd" => Self::Cd(first),
            "pwd" => Self::Pwd,
            "cat" => Self::Cat(first),
            "clear" => Self::Clear,
            "scarb" => match args.first().copied() {
                Some("build") => Self::ScarbBuild,
                Some("test") => Self::ScarbTest,
                _ => Self::ScarbUsage(first),
            },
            "starknet" => match args.first().copied() {
                Some("deploy") => Self::StarknetDeploy,
                _ => Self::StarknetUsage(first),
            },
            "cairo-compile" => Self::CairoCompile(first),
            "tree" => Self::Tree(first),
            "whoami" => Self::Whoami,
            "date" => Self::Date,
            "echo" => Self::Echo(args.join(" ")),
            _ => Self::Unknown(name.to_string()),
        }
    }

    /// Parse a whole input line. Returns `None` for blank input.
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let name = words.next()?;
        let args: Vec<&str> = words.collect();
        Some(Self::parse(name, &args))
    }
}

// =============================================================================
// Outcome Types
// =============================================================================

/// Output appended only after a simulated run time.
#[derive(Clone, Debug, PartialEq)]
pub struct DeferredOutput {
    pub delay_ms: u32,
    pub entries: Vec<TerminalEntry>,
    /// Lines posted to the IDE log stream when the command finishes
    pub logs: Vec<DeploymentLog>,
}

/// Result of executing a command.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommandOutcome {
    /// Entries appended immediately
    pub output: Vec<TerminalEntry>,
    /// New working directory (for `cd`)
    pub cwd: Option<String>,
    /// Whether the scrollback should be wiped (for `clear`)
    pub clear: bool,
    /// Entries appended once the command "finishes"
    pub deferred: Option<DeferredOutput>,
}

impl CommandOutcome {
    fn output(entries: Vec<TerminalEntry>) -> Self {
        Self {
            output: entries,
            ..Self::default()
        }
    }

    fn deferred(
        now: u64,
        started: Vec<String>,
        delay_ms: u32,
        finished: Vec<TerminalEntry>,
    ) -> Self {
        Self {
            output: started
                .into_iter()
                .map(|line| TerminalEntry::output(line, now))
                .collect(),
            deferred: Some(DeferredOutput {
                delay_ms,
                entries: finished,
                logs: Vec::new(),
            }),
            ..Self::default()
        }
    }

    /// Post `message` to the IDE log stream when the deferred part finishes.
    fn logging(mut self, level: LogLevel, message: String, timestamp: u64) -> Self {
        if let Some(deferred) = &mut self.deferred {
            deferred.logs.push(DeploymentLog {
                timestamp,
                level,
                message,
            });
        }
        self
    }

    fn error(text: impl Into<String>, exit_code: i32, now: u64) -> Self {
        Self::output(vec![TerminalEntry::error(text, exit_code, now)])
    }
}

// =============================================================================
// Execution
// =============================================================================

/// Execute a parsed command relative to `cwd` at time `now` (ms since epoch).
pub fn execute<R: Rng + ?Sized>(cmd: Command, cwd: &str, now: u64, rng: &mut R) -> CommandOutcome {
    match cmd {
        Command::Help => CommandOutcome::output(vec![TerminalEntry::output(HELP_TEXT.trim_end(), now)]),
        Command::Ls(path) => execute_ls(path.as_deref(), cwd, now),
        Command::Cd(path) => execute_cd(path.as_deref(), cwd, now),
        Command::Pwd => CommandOutcome::output(vec![TerminalEntry::output(cwd, now)]),
        Command::Cat(path) => execute_cat(path.as_deref(), cwd, now),
        Command::Clear => CommandOutcome {
            clear: true,
            ..CommandOutcome::default()
        },
        Command::ScarbBuild => execute_scarb_build(cwd, now),
        Command::ScarbTest => execute_scarb_test(cwd, now),
        Command::ScarbUsage(sub) => scarb_usage(sub.as_deref(), now),
        Command::StarknetDeploy => execute_deploy(cwd, now, rng),
        Command::StarknetUsage(sub) => starknet_usage(sub.as_deref(), now),
        Command::CairoCompile(path) => execute_cairo_compile(path.as_deref(), cwd, now),
        Command::Tree(path) => execute_tree(path.as_deref(), cwd, now),
        Command::Whoami => CommandOutcome::output(vec![TerminalEntry::output(USER, now)]),
        Command::Date => CommandOutcome::output(vec![TerminalEntry::output(format_timestamp(now), now)]),
        Command::Echo(text) => CommandOutcome::output(vec![TerminalEntry::output(text, now)]),
        Command::Unknown(name) => {
            CommandOutcome::error(format!("{}: command not found", name), EXIT_NOT_FOUND, now)
        }
    }
}

fn execute_ls(path: Option<&str>, cwd: &str, now: u64) -> CommandOutcome {
    let target = path.unwrap_or(".");
    let resolved = mock_fs::resolve(cwd, target);

    if let Some(entries) = mock_fs::list_dir(&resolved) {
        let listing = entries
            .iter()
            .map(|e| {
                if e.is_dir {
                    format!("{}/", e.name)
                } else {
                    e.name.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        CommandOutcome::output(vec![TerminalEntry::output(listing, now)])
    } else if mock_fs::read_file(&resolved).is_some() {
        CommandOutcome::output(vec![TerminalEntry::output(target, now)])
    } else {
        CommandOutcome::error(
            format!("ls: cannot access '{}': No such file or directory", target),
            EXIT_FAILURE,
            now,
        )
    }
}

fn execute_cd(path: Option<&str>, cwd: &str, now: u64) -> CommandOutcome {
    let target = path.unwrap_or(HOME);
    let resolved = mock_fs::resolve(cwd, target);

    if mock_fs::is_dir(&resolved) {
        CommandOutcome {
            cwd: Some(resolved),
            ..CommandOutcome::default()
        }
    } else if mock_fs::read_file(&resolved).is_some() {
        CommandOutcome::error(format!("cd: not a directory: {}", target), EXIT_FAILURE, now)
    } else {
        CommandOutcome::error(
            format!("cd: no such file or directory: {}", target),
            EXIT_FAILURE,
            now,
        )
    }
}

fn execute_cat(path: Option<&str>, cwd: &str, now: u64) -> CommandOutcome {
    let Some(target) = path else {
        return CommandOutcome::error("cat: missing file operand", EXIT_FAILURE, now);
    };
    let resolved = mock_fs::resolve(cwd, target);

    match mock_fs::read_file(&resolved) {
        Some(content) => CommandOutcome::output(vec![TerminalEntry::output(content.trim_end(), now)]),
        None if mock_fs::is_dir(&resolved) => {
            CommandOutcome::error(format!("cat: {}: Is a directory", target), EXIT_FAILURE, now)
        }
        None => CommandOutcome::error(
            format!("cat: {}: No such file or directory", target),
            EXIT_FAILURE,
            now,
        ),
    }
}

fn execute_tree(path: Option<&str>, cwd: &str, now: u64) -> CommandOutcome {
    let target = path.unwrap_or(".");
    match mock_fs::tree_lines(&mock_fs::resolve(cwd, target)) {
        Some(lines) => CommandOutcome::output(vec![TerminalEntry::output(lines.join("\n"), now)]),
        None => CommandOutcome::error(
            format!("{} [error opening dir]", target),
            EXIT_FAILURE,
            now,
        ),
    }
}

/// Scarb commands only work inside the mock project.
fn require_project(cwd: &str, now: u64) -> Result<(), CommandOutcome> {
    if cwd == START_DIR || cwd.starts_with(&format!("{}/", START_DIR)) {
        Ok(())
    } else {
        Err(CommandOutcome::error(
            format!(
                "error: could not find `Scarb.toml` in `{}` or any parent directory",
                cwd
            ),
            EXIT_FAILURE,
            now,
        ))
    }
}

fn execute_scarb_build(cwd: &str, now: u64) -> CommandOutcome {
    if let Err(outcome) = require_project(cwd, now) {
        return outcome;
    }
    let finished = now + u64::from(delays::SCARB_BUILD);
    CommandOutcome::deferred(
        now,
        vec![format!(
            "   Compiling {} v0.1.0 ({}/Scarb.toml)",
            PACKAGE, START_DIR
        )],
        delays::SCARB_BUILD,
        vec![TerminalEntry::output(
            "    Finished `dev` profile target(s) in 2 seconds",
            finished,
        )],
    )
    .logging(
        LogLevel::Success,
        format!("Built {} via terminal", PACKAGE),
        finished,
    )
}

fn execute_scarb_test(cwd: &str, now: u64) -> CommandOutcome {
    if let Err(outcome) = require_project(cwd, now) {
        return outcome;
    }
    let finished = now + u64::from(delays::SCARB_TEST);
    CommandOutcome::deferred(
        now,
        vec![
            format!("   Compiling {}_tests v0.1.0 ({}/Scarb.toml)", PACKAGE, START_DIR),
            "    Running cairo-test".to_string(),
        ],
        delays::SCARB_TEST,
        vec![
            TerminalEntry::output(
                format!("Collected 1 test(s) from {} package", PACKAGE),
                finished,
            ),
            TerminalEntry::output(
                format!(
                    "[PASS] {}_tests::test_counter::test_increment (gas: ~128)",
                    PACKAGE
                ),
                finished,
            ),
            TerminalEntry::output(
                "Tests: 1 passed, 0 failed, 0 skipped, 0 ignored, 0 filtered out",
                finished,
            ),
        ],
    )
}

fn scarb_usage(sub: Option<&str>, now: u64) -> CommandOutcome {
    let text = match sub {
        Some(s) => format!("error: no such command: `{}`\n\nUsage: scarb <build|test>", s),
        None => "Usage: scarb <build|test>".to_string(),
    };
    CommandOutcome::error(text, EXIT_FAILURE, now)
}

fn execute_deploy<R: Rng + ?Sized>(cwd: &str, now: u64, rng: &mut R) -> CommandOutcome {
    if let Err(outcome) = require_project(cwd, now) {
        return outcome;
    }
    let finished = now + u64::from(delays::STARKNET_DEPLOY);
    let address = random_felt(rng);
    CommandOutcome::deferred(
        now,
        vec!["Deploying HelloStarknet to Sepolia...".to_string()],
        delays::STARKNET_DEPLOY,
        vec![
            TerminalEntry::output(format!("Contract deployed at {}", address), finished),
            TerminalEntry::output(format!("Transaction hash: {}", random_felt(rng)), finished),
        ],
    )
    .logging(
        LogLevel::Info,
        "Deploying HelloStarknet to Sepolia via terminal".to_string(),
        now,
    )
    .logging(
        LogLevel::Success,
        format!("Contract deployed via terminal at {}", address),
        finished,
    )
}

fn starknet_usage(sub: Option<&str>, now: u64) -> CommandOutcome {
    let text = match sub {
        Some(s) => format!("starknet: unknown subcommand '{}'\nUsage: starknet deploy", s),
        None => "Usage: starknet deploy".to_string(),
    };
    CommandOutcome::error(text, EXIT_FAILURE, now)
}

fn execute_cairo_compile(path: Option<&str>, cwd: &str, now: u64) -> CommandOutcome {
    let target = path.unwrap_or("src/lib.cairo");
    let resolved = mock_fs::resolve(cwd, target);
    let Some(source) = mock_fs::read_file(&resolved) else {
        return CommandOutcome::error(
            format!("cairo-compile: {}: No such file", target),
            EXIT_FAILURE,
            now,
        );
    };
    if !resolved.ends_with(".cairo") {
        return CommandOutcome::error(
            format!("cairo-compile: {}: not a Cairo source file", target),
            EXIT_FAILURE,
            now,
        );
    }

    let finished = now + u64::from(delays::CAIRO_COMPILE);
    CommandOutcome::deferred(
        now,
        vec![format!("Compiling {}...", target)],
        delays::CAIRO_COMPILE,
        vec![TerminalEntry::output(
            format!("Compiled {} (class hash {})", target, class_hash(source)),
            finished,
        )],
    )
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn run(line: &str, cwd: &str) -> CommandOutcome {
        let mut rng = StdRng::seed_from_u64(0);
        execute(Command::parse_line(line).unwrap(), cwd, 1_000, &mut rng)
    }

    #[test]
    fn test_parse() {
        assert_eq!(Command::parse_line("   "), None);
        assert_eq!(Command::parse_line("ls"), Some(Command::Ls(None)));
        assert_eq!(
            Command::parse_line("cd  src "),
            Some(Command::Cd(Some("src".to_string())))
        );
        assert_eq!(Command::parse_line("scarb build"), Some(Command::ScarbBuild));
        assert_eq!(Command::parse_line("scarb test"), Some(Command::ScarbTest));
        assert_eq!(Command::parse_line("scarb"), Some(Command::ScarbUsage(None)));
        assert_eq!(Command::parse_line("starknet deploy"), Some(Command::StarknetDeploy));
        assert_eq!(
            Command::parse_line("echo  hello   world"),
            Some(Command::Echo("hello world".to_string()))
        );
        assert_eq!(
            Command::parse_line("foo bar"),
            Some(Command::Unknown("foo".to_string()))
        );
    }

    #[test]
    fn test_command_names_ignore_case() {
        assert_eq!(Command::parse_line("LS"), Some(Command::Ls(None)));
        assert_eq!(Command::parse_line("Help"), Some(Command::Help));
        assert_eq!(Command::parse_line("SCARB build"), Some(Command::ScarbBuild));
        assert_eq!(
            Command::parse_line("Cat README.md"),
            Some(Command::Cat(Some("README.md".to_string())))
        );
        assert_eq!(
            Command::parse_line("ECHO Hello"),
            Some(Command::Echo("Hello".to_string()))
        );

        let out = run("LS", START_DIR);
        assert_eq!(out.output[0].kind, EntryKind::Output);
        assert_eq!(out.output[0].exit_code, None);
    }

    #[test]
    fn test_echo() {
        let out = run("echo hello world", START_DIR);
        assert_eq!(out.output.len(), 1);
        assert_eq!(out.output[0].kind, EntryKind::Output);
        assert_eq!(out.output[0].text, "hello world");
    }

    #[test]
    fn test_unknown_command_exit_127() {
        let out = run("foo", START_DIR);
        assert_eq!(out.output.len(), 1);
        assert_eq!(out.output[0].kind, EntryKind::Error);
        assert_eq!(out.output[0].exit_code, Some(127));
        assert_eq!(out.output[0].text, "foo: command not found");
    }

    #[test]
    fn test_cat_scarb_toml() {
        let out = run("cat Scarb.toml", START_DIR);
        assert_eq!(out.output.len(), 1);
        assert!(
            out.output[0]
                .text
                .contains("[package]\nname = \"hello_starknet\"\nversion = \"0.1.0\"")
        );
    }

    #[test]
    fn test_cat_errors() {
        assert_eq!(run("cat", START_DIR).output[0].exit_code, Some(1));
        assert!(run("cat src", START_DIR).output[0].text.contains("Is a directory"));
        assert!(run("cat nope", START_DIR).output[0].text.contains("No such file"));
    }

    #[test]
    fn test_cd() {
        assert_eq!(
            run("cd src", START_DIR).cwd.as_deref(),
            Some("/home/starknet/project/src")
        );
        assert_eq!(run("cd", "/tmp").cwd.as_deref(), Some(HOME));
        let not_dir = run("cd Scarb.toml", START_DIR);
        assert_eq!(not_dir.cwd, None);
        assert_eq!(not_dir.output[0].text, "cd: not a directory: Scarb.toml");
        let missing = run("cd nowhere", START_DIR);
        assert_eq!(missing.output[0].exit_code, Some(1));
    }

    #[test]
    fn test_ls() {
        let out = run("ls", START_DIR);
        assert_eq!(out.output[0].text, "src/  target/  tests/  README.md  Scarb.toml");
        assert_eq!(run("ls Scarb.toml", START_DIR).output[0].text, "Scarb.toml");
        assert_eq!(run("ls nope", START_DIR).output[0].kind, EntryKind::Error);
    }

    #[test]
    fn test_pwd_whoami_date() {
        assert_eq!(run("pwd", START_DIR).output[0].text, START_DIR);
        assert_eq!(run("whoami", START_DIR).output[0].text, USER);
        assert_eq!(run("date", START_DIR).output[0].text, "1970-01-01 00:00:01 UTC");
    }

    #[test]
    fn test_clear() {
        let out = run("clear", START_DIR);
        assert!(out.clear);
        assert!(out.output.is_empty());
    }

    #[test]
    fn test_scarb_build_is_deferred() {
        let out = run("scarb build", START_DIR);
        assert_eq!(out.output.len(), 1);
        let deferred = out.deferred.unwrap();
        assert_eq!(deferred.delay_ms, delays::SCARB_BUILD);
        assert!(deferred.entries[0].text.contains("Finished"));
        assert_eq!(deferred.logs.len(), 1);
        assert_eq!(deferred.logs[0].level, LogLevel::Success);
        assert_eq!(deferred.logs[0].message, "Built hello_starknet via terminal");
        assert_eq!(deferred.logs[0].timestamp, 1_000 + u64::from(delays::SCARB_BUILD));
    }

    #[test]
    fn test_scarb_outside_project() {
        let out = run("scarb test", "/tmp");
        assert!(out.deferred.is_none());
        assert_eq!(out.output[0].exit_code, Some(1));
    }

    #[test]
    fn test_scarb_usage() {
        let out = run("scarb publish", START_DIR);
        assert!(out.output[0].text.contains("no such command: `publish`"));
    }

    #[test]
    fn test_starknet_deploy_generates_address() {
        let out = run("starknet deploy", START_DIR);
        let deferred = out.deferred.unwrap();
        let entries = &deferred.entries;
        assert!(entries[0].text.starts_with("Contract deployed at 0x"));
        assert!(entries[1].text.starts_with("Transaction hash: 0x"));

        let levels: Vec<_> = deferred.logs.iter().map(|l| l.level).collect();
        assert_eq!(levels, [LogLevel::Info, LogLevel::Success]);
        let address = entries[0].text.trim_start_matches("Contract deployed at ");
        assert_eq!(
            deferred.logs[1].message,
            format!("Contract deployed via terminal at {}", address)
        );
    }

    #[test]
    fn test_other_deferred_commands_do_not_log() {
        assert!(run("scarb test", START_DIR).deferred.unwrap().logs.is_empty());
        assert!(run("cairo-compile", START_DIR).deferred.unwrap().logs.is_empty());
    }

    #[test]
    fn test_cairo_compile() {
        let out = run("cairo-compile", START_DIR);
        let entries = out.deferred.unwrap().entries;
        assert!(entries[0].text.starts_with("Compiled src/lib.cairo (class hash 0x"));

        assert_eq!(
            run("cairo-compile Scarb.toml", START_DIR).output[0].exit_code,
            Some(1)
        );
        assert_eq!(run("cairo-compile x.cairo", START_DIR).output[0].exit_code, Some(1));
    }

    #[test]
    fn test_tree() {
        let out = run("tree src", START_DIR);
        assert!(out.output[0].text.ends_with("0 directories, 2 files"));
        assert_eq!(run("tree nope", START_DIR).output[0].kind, EntryKind::Error);
    }
}
