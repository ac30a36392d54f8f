//! Status bar component.
//!
//! Displays the active file, unsaved tab count, package, and network.
//! Transient notices replace the right-hand side for a few seconds.

use leptos::prelude::*;
use leptos_icons::Icon;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::config::NOTICE_MS;
use crate::utils::timer;

stylance::import_crate_style!(css, "src/components/status/status.module.css");

/// Unsaved tab count, hidden when every tab is saved.
fn unsaved_label(dirty: usize) -> Option<String> {
    (dirty > 0).then(|| format!("{} unsaved", dirty))
}

/// Status bar component.
///
/// ## Responsive behavior
///
/// | Breakpoint | Display |
/// |------------|---------|
/// | Desktop (> 768px) | `/src/lib.cairo  Cairo  2 unsaved ... Package: hello  Network: Sepolia` |
/// | Mobile (<= 768px) | Language and labels hidden, values only |
#[component]
pub fn Status() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");

    let active = Memo::new(move |_| {
        ctx.workspace.with(|ws| {
            ws.tabs
                .active()
                .map(|t| (t.path.clone(), t.language()))
        })
    });
    let dirty = Memo::new(move |_| ctx.workspace.with(|ws| ws.tabs.dirty_count()));
    let package = Memo::new(move |_| ctx.workspace.with(|ws| ws.package_name()));
    let network = move || ctx.network.get().name();

    // Clear each notice after a while, unless a newer one replaced it
    Effect::new(move |_| {
        let Some(message) = ctx.notice.get() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            timer::sleep(NOTICE_MS).await;
            ctx.notice.try_update(|n| {
                if n.as_deref() == Some(message.as_str()) {
                    *n = None;
                }
            });
        });
    });

    view! {
        <footer class=css::bar>
            <div class=css::section>
                <button
                    class=css::toggleButton
                    title="Toggle sidebar (Ctrl+B)"
                    on:click=move |_| ctx.toggle_sidebar()
                >
                    <Icon icon=ic::SIDEBAR />
                </button>
                <span class=css::label>
                    <span class=css::labelIcon><Icon icon=ic::FILE /></span>
                    <span class=css::value>
                        {move || active.get().map(|a| a.0).unwrap_or_else(|| "No file".to_string())}
                    </span>
                </span>
                {move || active.get().map(|(_, lang)| view! { <span class=css::labelDim>{lang}</span> })}
                <Show when=move || { unsaved_label(dirty.get()).is_some() } fallback=|| ()>
                    <span class=css::labelYellow>
                        <span class=css::labelIcon><Icon icon=ic::SAVE /></span>
                        <span class=css::value>
                            {move || unsaved_label(dirty.get()).unwrap_or_default()}
                        </span>
                    </span>
                </Show>
            </div>

            <div class=css::section>
                {move || ctx.notice.get().map(|n| view! { <span class=css::notice>{n}</span> })}
                {move || {
                    package
                        .get()
                        .map(|p| {
                            view! {
                                <span class=css::labelCyan>
                                    <span class=css::labelText>"Package:"</span>
                                    <span class=css::value>{p}</span>
                                </span>
                            }
                        })
                }}
                <span class=css::labelPurple>
                    <span class=css::labelText>"Network:"</span>
                    <span class=css::labelIcon><Icon icon=ic::NETWORK /></span>
                    <span class=css::value>{network}</span>
                </span>
                <button
                    class=css::toggleButton
                    title="Toggle terminal (Ctrl+`)"
                    on:click=move |_| ctx.toggle_terminal()
                >
                    <Icon icon=ic::TERMINAL />
                </button>
            </div>
        </footer>
    }
}
