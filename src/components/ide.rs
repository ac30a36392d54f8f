//! Top-level IDE layout.
//!
//! Activity bar, resizable sidebar, editor over terminal, status bar, and the
//! workflow dialogs. Global keyboard shortcuts are installed here.

use leptos::{ev, prelude::*};
use leptos_icons::Icon;
use leptos_use::use_media_query;

use crate::app::AppContext;
use crate::components::dialogs::{DeployDialog, ImportDialog};
use crate::components::editor::Editor;
use crate::components::icons as ic;
use crate::components::sidebar::Sidebar;
use crate::components::status::Status;
use crate::components::terminal::Terminal;
use crate::config::layout::{ACTIVITY_BAR_WIDTH, NARROW_QUERY};
use crate::config::{APP_NAME, APP_VERSION};
use crate::models::ActivePanel;

stylance::import_crate_style!(css, "src/components/ide.module.css");

// ============================================================================
// Global listeners
// ============================================================================

/// `Ctrl/Cmd+S` save (with Shift: save all), `Ctrl/Cmd+B` sidebar,
/// `` Ctrl+` `` terminal.
fn setup_shortcuts(ctx: AppContext) {
    let handle = window_event_listener(ev::keydown, move |ev: ev::KeyboardEvent| {
        let modifier = ev.ctrl_key() || ev.meta_key();
        if !modifier {
            return;
        }
        match ev.key().as_str() {
            "s" | "S" => {
                ev.prevent_default();
                if ev.shift_key() {
                    ctx.save_all();
                } else {
                    ctx.save_active();
                }
            }
            "b" | "B" => {
                ev.prevent_default();
                ctx.toggle_sidebar();
            }
            "`" if ev.ctrl_key() => {
                ev.prevent_default();
                ctx.toggle_terminal();
            }
            _ => {}
        }
    });
    on_cleanup(move || handle.remove());
}

/// Drag the sidebar edge while `resizing` is set.
fn setup_resize(ctx: AppContext, resizing: RwSignal<bool>) {
    let on_move = window_event_listener(ev::mousemove, move |ev: ev::MouseEvent| {
        if !resizing.get_untracked() {
            return;
        }
        let width = (ev.client_x() - ACTIVITY_BAR_WIDTH as i32).max(0) as u32;
        ctx.set_sidebar_width(width);
    });
    let on_up = window_event_listener(ev::mouseup, move |_| {
        if resizing.get_untracked() {
            resizing.set(false);
        }
    });
    on_cleanup(move || {
        on_move.remove();
        on_up.remove();
    });
}

// ============================================================================
// Components
// ============================================================================

#[component]
fn ActivityBar() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");

    // Clicking the shown panel again collapses the sidebar
    let select = move |panel: ActivePanel| {
        if ctx.active_panel.get_untracked() == panel && !ctx.sidebar_collapsed.get_untracked() {
            ctx.sidebar_collapsed.set(true);
        } else {
            ctx.active_panel.set(panel);
            ctx.sidebar_collapsed.set(false);
        }
    };

    let item = move |panel: ActivePanel, icon: icondata::Icon| {
        let class = move || {
            if ctx.active_panel.get() == panel && !ctx.sidebar_collapsed.get() {
                format!("{} {}", css::activityItem, css::activityItemActive)
            } else {
                css::activityItem.to_string()
            }
        };
        view! {
            <button class=class title=panel.title() on:click=move |_| select(panel)>
                <Icon icon=icon />
            </button>
        }
    };

    view! {
        <nav class=css::activityBar>
            {item(ActivePanel::Files, ic::EXPLORER)}
            {item(ActivePanel::Search, ic::SEARCH)}
            {item(ActivePanel::Deploy, ic::DEPLOY)}
        </nav>
    }
}

/// The whole IDE.
#[component]
pub fn Ide() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");
    let resizing = RwSignal::new(false);

    let is_narrow = use_media_query(NARROW_QUERY.to_string());
    Effect::new(move |_| {
        if is_narrow.get() {
            ctx.sidebar_collapsed.set(true);
        }
    });

    setup_shortcuts(ctx);
    setup_resize(ctx, resizing);

    let root_class = move || {
        if resizing.get() {
            format!("{} {}", css::ide, css::resizing)
        } else {
            css::ide.to_string()
        }
    };

    view! {
        <div class=root_class>
            <header class=css::titleBar>
                <span class=css::appName>{APP_NAME}</span>
                <span class=css::appVersion>{format!("v{}", APP_VERSION)}</span>
            </header>

            <div class=css::main>
                <ActivityBar />
                <Show when=move || !ctx.sidebar_collapsed.get() fallback=|| ()>
                    <Sidebar />
                    <div
                        class=css::resizeHandle
                        title="Drag to resize"
                        on:mousedown=move |ev: ev::MouseEvent| {
                            ev.prevent_default();
                            resizing.set(true);
                        }
                    ></div>
                </Show>
                <div class=css::workbench>
                    <Editor />
                    <Show when=move || ctx.terminal_visible.get() fallback=|| ()>
                        <div class=css::terminalPane>
                            <Terminal />
                        </div>
                    </Show>
                </div>
            </div>

            <Status />
            <DeployDialog />
            <ImportDialog />
        </div>
    }
}
