//! Application configuration.
//!
//! Centralizes all configuration constants used throughout the application.
//! Text assets are loaded at compile time using `include_str!`.

// =============================================================================
// Text Assets (loaded at compile time)
// =============================================================================

/// Help text for `help` command.
pub const HELP_TEXT: &str = include_str!("../assets/text/help.txt");

/// First line printed in a new shell session.
pub const WELCOME_TEXT: &str = include_str!("../assets/text/welcome.txt");

/// Project template shown on first launch.
pub mod template {
    pub const SCARB_TOML: &str = include_str!("../assets/templates/Scarb.toml");
    pub const LIB_CAIRO: &str = include_str!("../assets/templates/src/lib.cairo");
    pub const COUNTER_CAIRO: &str = include_str!("../assets/templates/src/counter.cairo");
    pub const TEST_COUNTER_CAIRO: &str =
        include_str!("../assets/templates/tests/test_counter.cairo");
    pub const README_MD: &str = include_str!("../assets/templates/README.md");
}

// =============================================================================
// Application Metadata
// =============================================================================

/// Application name shown in the title bar.
pub const APP_NAME: &str = "Cairo IDE";

/// Application version.
pub const APP_VERSION: &str = "0.1.0";

// =============================================================================
// Persistence
// =============================================================================

/// localStorage key holding the workspace snapshot.
pub const STORAGE_KEY: &str = "cairo-ide-state";

// =============================================================================
// Layout Configuration
// =============================================================================

/// Sidebar width bounds in pixels.
pub mod layout {
    pub const SIDEBAR_DEFAULT_WIDTH: u32 = 260;
    pub const SIDEBAR_MIN_WIDTH: u32 = 180;
    pub const SIDEBAR_MAX_WIDTH: u32 = 600;
    /// Fixed width of the activity bar left of the sidebar.
    pub const ACTIVITY_BAR_WIDTH: u32 = 48;
    /// Viewports narrower than this start with the sidebar collapsed.
    pub const NARROW_QUERY: &str = "(max-width: 768px)";
}

// =============================================================================
// Terminal Configuration
// =============================================================================

/// Terminal session configuration.
pub mod terminal {
    /// Maximum number of scrollback entries kept per session.
    pub const MAX_SCROLLBACK: usize = 1000;
    /// Maximum number of command history entries shared by all shells.
    pub const MAX_COMMAND_HISTORY: usize = 100;
    /// Simulated user name.
    pub const USER: &str = "starknet-dev";
    /// Simulated home directory.
    pub const HOME: &str = "/home/starknet";
    /// Directory new shell sessions start in.
    pub const START_DIR: &str = "/home/starknet/project";
    /// Exit code for unknown commands.
    pub const EXIT_NOT_FOUND: i32 = 127;
    /// Exit code for misuse of a known command.
    pub const EXIT_FAILURE: i32 = 1;

    /// Simulated run time of long-running commands (milliseconds).
    pub mod delays {
        pub const SCARB_BUILD: u32 = 1500;
        pub const SCARB_TEST: u32 = 2000;
        pub const STARKNET_DEPLOY: u32 = 2500;
        pub const CAIRO_COMPILE: u32 = 1200;
    }

    /// Commands offered by Tab completion.
    pub const COMPLETIONS: &[&str] = &[
        "help",
        "ls",
        "cd",
        "pwd",
        "cat",
        "clear",
        "scarb build",
        "scarb test",
        "starknet deploy",
        "cairo-compile",
        "tree",
        "whoami",
        "date",
        "echo",
    ];
}

// =============================================================================
// Workflow Configuration
// =============================================================================

/// Deployment simulator configuration.
pub mod deploy {
    /// Time each step spends in the loading state (milliseconds).
    pub const STEP_DELAY_MS: u32 = 1200;
    /// Probability that a smart-deploy step attempt fails.
    pub const FAILURE_RATE: f64 = 0.15;
    /// Total attempts (including the first) for auto-retryable steps.
    pub const MAX_ATTEMPTS: u32 = 3;
    /// Linear backoff unit; attempt `n` waits `n * RETRY_BACKOFF_MS`.
    pub const RETRY_BACKOFF_MS: u32 = 1000;
    /// Steps the smart deployer retries on its own.
    pub const AUTO_RETRY_STEPS: &[&str] = &["verify-account", "declare", "deploy"];
}

/// Project import configuration.
pub mod import {
    /// Percentage added to the import progress per tick.
    pub const PROGRESS_STEP: u8 = 10;
    pub const PROGRESS_TICK_MS: u32 = 100;
}

/// Compile action configuration.
pub mod compile {
    pub const DELAY_MS: u32 = 1000;
}

// =============================================================================
// UI Configuration
// =============================================================================

/// How long a status bar notice stays visible (milliseconds).
pub const NOTICE_MS: u32 = 4000;

/// Icon theme selection.
///
/// Available themes:
/// - `Bootstrap` - Familiar, slightly bolder (default)
/// - `Lucide` - Minimal, thin strokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(dead_code)]
pub enum IconTheme {
    #[default]
    Bootstrap,
    Lucide,
}

/// Current icon theme used throughout the application.
/// Change this value to switch icon styles globally.
pub const ICON_THEME: IconTheme = IconTheme::Bootstrap;
