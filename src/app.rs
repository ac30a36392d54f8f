//! Root application module.
//!
//! Contains the main App component, the [`AppContext`] shared by every
//! component, and the glue that loads the saved workspace at mount and writes
//! it back whenever it changes.

use leptos::prelude::*;

use crate::components::Ide;
use crate::config::compile::DELAY_MS as COMPILE_DELAY_MS;
use crate::core::compile::{compile_finished, compile_started};
use crate::core::deploy::{Deployment, Host};
use crate::core::error::FileTreeError;
use crate::core::import::ProjectImport;
use crate::core::terminal::SessionManager;
use crate::core::{Snapshot, Workspace, clamp_sidebar_width};
use crate::models::{ActivePanel, DeploymentLog, LogLevel, Network};
use crate::utils::dom::now_ms;
use crate::utils::{log, storage, timer};

// ============================================================================
// AppContext
// ============================================================================

/// Application-wide reactive context.
///
/// Provided at the root of the component tree and read with
/// `use_context::<AppContext>()`. Every field is a signal, so the context is
/// `Copy`.
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Project files and open editor tabs (persisted).
    pub workspace: RwSignal<Workspace>,
    /// Terminal sessions.
    pub terminal: RwSignal<SessionManager>,
    /// IDE log stream mirrored by log sessions.
    pub logs: RwSignal<Vec<DeploymentLog>>,
    /// Sidebar panel (persisted).
    pub active_panel: RwSignal<ActivePanel>,
    /// Sidebar width in pixels (persisted).
    pub sidebar_width: RwSignal<u32>,
    pub sidebar_collapsed: RwSignal<bool>,
    pub terminal_visible: RwSignal<bool>,
    /// Network selected for deployments.
    pub network: RwSignal<Network>,
    /// Open deployment dialog, if any.
    pub deployment: RwSignal<Option<Deployment>>,
    /// Import dialog is shown.
    pub import_open: RwSignal<bool>,
    /// Import in progress or finished, while the dialog is open.
    pub import: RwSignal<Option<ProjectImport>>,
    /// Transient status bar message.
    pub notice: RwSignal<Option<String>>,
    /// Compile action in flight.
    pub compiling: RwSignal<bool>,
}

impl AppContext {
    /// Creates the context from the saved snapshot, or the template project.
    pub fn new() -> Self {
        let snapshot = storage::load_or_warn()
            .unwrap_or_else(|| Snapshot::initial(&mut rand::thread_rng()));
        let (workspace, panel, width) = snapshot.into_parts();

        Self {
            workspace: RwSignal::new(workspace),
            terminal: RwSignal::new(SessionManager::new(now_ms())),
            logs: RwSignal::new(Vec::new()),
            active_panel: RwSignal::new(panel),
            sidebar_width: RwSignal::new(width),
            sidebar_collapsed: RwSignal::new(false),
            terminal_visible: RwSignal::new(true),
            network: RwSignal::new(Network::default()),
            deployment: RwSignal::new(None),
            import_open: RwSignal::new(false),
            import: RwSignal::new(None),
            notice: RwSignal::new(None),
            compiling: RwSignal::new(false),
        }
    }

    /// Current persisted state.
    pub fn snapshot(&self) -> Snapshot {
        let panel = self.active_panel.get();
        let width = self.sidebar_width.get();
        self.workspace.with(|ws| Snapshot::capture(ws, panel, width))
    }

    /// Show a message in the status bar.
    pub fn notify(&self, message: impl Into<String>) {
        self.notice.set(Some(message.into()));
    }

    /// Append lines to the IDE log stream.
    pub fn log(&self, entries: impl IntoIterator<Item = DeploymentLog>) {
        self.logs.update(|logs| logs.extend(entries));
    }

    pub fn log_line(&self, level: LogLevel, message: impl Into<String>) {
        self.log([DeploymentLog {
            timestamp: now_ms(),
            level,
            message: message.into(),
        }]);
    }

    /// Open `path` in the editor, reporting failures in the status bar.
    pub fn open_file(&self, path: &str) {
        let result = self
            .workspace
            .try_update(|ws| ws.open_file(&mut rand::thread_rng(), path));
        if let Some(Err(e)) = result {
            self.notify(e.to_string());
        }
    }

    /// Run a workspace mutation, reporting failures in the status bar.
    pub fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Workspace) -> Result<T, FileTreeError>,
    ) -> Option<T> {
        match self.workspace.try_update(f)? {
            Ok(value) => Some(value),
            Err(e) => {
                self.notify(e.to_string());
                None
            }
        }
    }

    /// Save the active editor tab.
    pub fn save_active(&self) {
        let Some(id) = self
            .workspace
            .with(|ws| ws.tabs.active_id().map(str::to_string))
        else {
            return;
        };
        if self.mutate(|ws| ws.save(&id)).is_some() {
            self.notify("Saved");
        }
    }

    /// Save every tab with unsaved changes.
    pub fn save_all(&self) {
        if let Some(count) = self.mutate(Workspace::save_all) {
            let plural = if count == 1 { "" } else { "s" };
            self.notify(format!("Saved {} file{}", count, plural));
        }
    }

    pub fn set_sidebar_width(&self, width: u32) {
        self.sidebar_width.set(clamp_sidebar_width(width));
    }

    pub fn toggle_sidebar(&self) {
        self.sidebar_collapsed.update(|c| *c = !*c);
    }

    pub fn toggle_terminal(&self) {
        self.terminal_visible.update(|v| *v = !*v);
    }

    /// Compile the active file, writing results to the log stream.
    pub fn compile_active(&self) {
        if self.compiling.get_untracked() {
            return;
        }
        let Some((path, source)) = self.workspace.with_untracked(|ws| {
            ws.tabs
                .active()
                .map(|tab| (tab.path.clone(), tab.content.clone()))
        }) else {
            self.notify("Open a file to compile");
            return;
        };

        let ctx = *self;
        ctx.compiling.set(true);
        ctx.log([compile_started(&path, now_ms())]);
        wasm_bindgen_futures::spawn_local(async move {
            timer::sleep(COMPILE_DELAY_MS).await;
            ctx.log(compile_finished(&path, &source, now_ms()));
            ctx.compiling.set(false);
        });
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Workflow hosting
// ============================================================================

impl<S: Send + Sync + 'static> Host<S> for RwSignal<Option<S>> {
    fn visit<T>(&self, f: impl FnOnce(&mut S) -> T) -> Option<T> {
        self.try_update(|slot| slot.as_mut().map(f)).flatten()
    }
}

// ============================================================================
// Persistence
// ============================================================================

/// Write the snapshot back whenever one of its fields changes.
fn persist_on_change(ctx: AppContext) {
    Effect::new(move |_| {
        let snapshot = ctx.snapshot();
        if let Err(e) = storage::save(&snapshot) {
            log::warn(&format!("Failed to save workspace: {}", e));
        }
    });
}

/// Keep log sessions in step with the IDE log stream.
fn mirror_logs(ctx: AppContext) {
    Effect::new(move |_| {
        ctx.logs.with(|logs| ctx.terminal.update(|t| t.mirror_logs(logs)));
    });
}

/// Root application component with error boundary.
///
/// This component:
/// - Creates and provides the global AppContext
/// - Wires persistence and log mirroring
/// - Wraps the app in an ErrorBoundary for graceful error handling
#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new();
    provide_context(ctx);
    persist_on_change(ctx);
    mirror_logs(ctx);
    log::info(&format!("{} v{} started", crate::config::APP_NAME, crate::config::APP_VERSION));

    view! {
        <ErrorBoundary
            fallback=|errors| view! {
                <div style="
                    display: flex;
                    flex-direction: column;
                    align-items: center;
                    justify-content: center;
                    height: 100vh;
                    padding: 2rem;
                    background: #1e1e1e;
                    color: #d4d4d4;
                    font-family: 'JetBrains Mono', monospace;
                ">
                    <h1 style="color: #f14c4c; margin-bottom: 1rem;">"Something went wrong"</h1>
                    <ul style="color: #f14c4c; font-size: 0.9rem;">
                        {move || errors.get()
                            .into_iter()
                            .map(|(_, e)| view! { <li>{e.to_string()}</li> })
                            .collect::<Vec<_>>()
                        }
                    </ul>
                    <button
                        on:click=move |_| {
                            if let Err(e) = storage::clear() {
                                log::error(&e.to_string());
                            }
                            if let Some(window) = web_sys::window() {
                                let _ = window.location().reload();
                            }
                        }
                        style="
                            background: #0e639c;
                            color: white;
                            border: none;
                            padding: 0.6rem 1.5rem;
                            border-radius: 4px;
                            cursor: pointer;
                        "
                    >
                        "Reset workspace and reload"
                    </button>
                </div>
            }
        >
            <Ide />
        </ErrorBoundary>
    }
}
