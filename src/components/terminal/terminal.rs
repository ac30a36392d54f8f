//! Terminal panel component.
//!
//! Session tabs on top, scrollback of the active session below, and an input
//! line for shell sessions. Log sessions only display the IDE log stream.

use leptos::prelude::*;
use leptos_icons::Icon;

use super::Input;
use super::Output;
use crate::app::AppContext;
use crate::components::icons as ic;
use crate::models::SessionKind;
use crate::utils::dom::{focus_element, now_ms};
use crate::utils::timer;

stylance::import_crate_style!(css, "src/components/terminal/terminal.module.css");

// ============================================================================
// Callback Factories
// ============================================================================

fn create_submit_callback(ctx: AppContext) -> Callback<String> {
    Callback::new(move |line: String| {
        let Some(id) = ctx.terminal.with_untracked(|t| t.active_id()) else {
            return;
        };
        let result = ctx
            .terminal
            .try_update(|t| t.submit(id, &line, now_ms(), &mut rand::thread_rng()));

        match result {
            Some(Ok(Some(pending))) => {
                wasm_bindgen_futures::spawn_local(async move {
                    timer::sleep(pending.delay_ms).await;
                    let logs = pending.logs.clone();
                    ctx.terminal.update(|t| {
                        t.complete(pending);
                    });
                    if !logs.is_empty() {
                        ctx.log(logs);
                    }
                });
            }
            Some(Err(e)) => ctx.notify(e.to_string()),
            _ => {}
        }
    })
}

fn create_history_nav_callback(ctx: AppContext) -> Callback<i32, Option<String>> {
    Callback::new(move |direction: i32| {
        ctx.terminal
            .try_update(|t| {
                if direction < 0 {
                    t.history_prev()
                } else {
                    t.history_next()
                }
            })
            .flatten()
    })
}

fn create_clear_callback(ctx: AppContext) -> Callback<()> {
    Callback::new(move |_| {
        if let Some(id) = ctx.terminal.with_untracked(|t| t.active_id())
            && let Some(Err(e)) = ctx.terminal.try_update(|t| t.clear(id))
        {
            ctx.notify(e.to_string());
        }
    })
}

// ============================================================================
// Terminal Component
// ============================================================================

#[component]
pub fn Terminal() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");
    let output_ref = NodeRef::<leptos::html::Div>::new();

    let on_submit = create_submit_callback(ctx);
    let on_history_nav = create_history_nav_callback(ctx);
    let on_clear = create_clear_callback(ctx);

    let active = Memo::new(move |_| {
        ctx.terminal
            .with(|t| t.active().map(|s| (s.id, s.kind, s.prompt(), s.busy)))
    });
    let prompt = Signal::derive(move || active.get().map(|a| a.2).unwrap_or_default());
    let busy = Signal::derive(move || active.get().is_some_and(|a| a.3));
    let is_shell = move || active.get().is_some_and(|a| a.1 == SessionKind::Shell);

    // Auto-scroll output to bottom when the scrollback changes
    Effect::new(move || {
        ctx.terminal.track();
        if let Some(el) = output_ref.get() {
            el.set_scroll_top(el.scroll_height());
        }
    });

    let add_shell = move |_| {
        ctx.terminal.update(|t| {
            let id = t.add_shell(now_ms());
            let _ = t.switch(id);
        });
    };
    let add_logs = move |_| {
        let logs = ctx.logs.get_untracked();
        ctx.terminal.update(|t| {
            let id = t.add_logs(&logs);
            let _ = t.switch(id);
        });
    };

    let tabs = move || {
        ctx.terminal.with(|t| {
            t.sessions()
                .iter()
                .map(|s| (s.id, s.name.clone(), s.kind, s.active, s.busy))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <section class=css::panel>
            <div class=css::tabBar>
                <For
                    each=tabs
                    key=|tab| tab.clone()
                    children=move |(id, name, kind, is_active, is_busy)| {
                        let icon = match kind {
                            SessionKind::Shell => ic::TERMINAL,
                            SessionKind::Logs => ic::LOGS,
                        };
                        let class = if is_active {
                            format!("{} {}", css::tab, css::tabActive)
                        } else {
                            css::tab.to_string()
                        };
                        view! {
                            <div
                                class=class
                                on:click=move |_| {
                                    if let Some(Err(e)) = ctx.terminal.try_update(|t| t.switch(id)) {
                                        ctx.notify(e.to_string());
                                    }
                                }
                            >
                                <Icon icon=icon />
                                <span>{name}</span>
                                {is_busy.then(|| view! { <span class=css::spinner></span> })}
                                <button
                                    class=css::tabClose
                                    title="Close session"
                                    on:click=move |ev| {
                                        ev.stop_propagation();
                                        if let Some(Err(e)) = ctx.terminal.try_update(|t| t.close(id)) {
                                            ctx.notify(e.to_string());
                                        }
                                    }
                                >
                                    <Icon icon=ic::CLOSE />
                                </button>
                            </div>
                        }
                    }
                />
                <div class=css::actions>
                    <button class=css::action title="New shell" on:click=add_shell>
                        <Icon icon=ic::PLUS />
                    </button>
                    <button class=css::action title="New log view" on:click=add_logs>
                        <Icon icon=ic::LOGS />
                    </button>
                    <button class=css::action title="Hide panel" on:click=move |_| ctx.toggle_terminal()>
                        <Icon icon=ic::CLOSE />
                    </button>
                </div>
            </div>

            <div
                node_ref=output_ref
                class=css::output
                on:click=move |_| {
                    focus_element("input[data-terminal]");
                }
            >
                <For
                    each=move || {
                        ctx.terminal.with(|t| {
                            t.active()
                                .map(|s| s.entries.iter().cloned().collect::<Vec<_>>())
                                .unwrap_or_default()
                        })
                    }
                    key=|entry| entry.id
                    children=|entry| view! { <Output entry=entry /> }
                />
                <Show when=is_shell fallback=|| ()>
                    <div class=css::inputArea>
                        <Input
                            prompt=prompt
                            busy=busy
                            on_submit=on_submit
                            on_history_nav=on_history_nav
                            on_clear=on_clear
                        />
                    </div>
                </Show>
            </div>
        </section>
    }
}
