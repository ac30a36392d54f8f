//! Tabbed text editor.
//!
//! A plain `<textarea>` bound to the active tab's working copy. Edits only
//! touch the tab; the file tree changes on save.

use leptos::{ev, prelude::*};
use leptos_icons::Icon;
use wasm_bindgen::JsCast;

use crate::app::AppContext;
use crate::components::icons as ic;

stylance::import_crate_style!(css, "src/components/editor/editor.module.css");

const INDENT: &str = "    ";

/// Tab strip entry: (id, name, path, dirty, active).
type TabItem = (String, String, String, bool, bool);

#[component]
pub fn Editor() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");

    let tabs = Memo::new(move |_| {
        ctx.workspace.with(|ws| {
            let active = ws.tabs.active_id();
            ws.tabs
                .tabs()
                .iter()
                .map(|t| {
                    let is_active = active == Some(t.id.as_str());
                    (t.id.clone(), t.name.clone(), t.path.clone(), t.is_dirty, is_active)
                })
                .collect::<Vec<TabItem>>()
        })
    });
    let active_id = Memo::new(move |_| {
        ctx.workspace
            .with(|ws| ws.tabs.active_id().map(str::to_string))
    });
    let content = move || {
        ctx.workspace
            .with(|ws| ws.tabs.active().map(|t| t.content.clone()).unwrap_or_default())
    };

    let on_input = move |ev: ev::Event| {
        let Some(id) = active_id.get_untracked() else {
            return;
        };
        let value = event_target_value(&ev);
        ctx.workspace.update(|ws| {
            ws.edit(&id, value);
        });
    };

    // Tab inserts spaces instead of moving focus
    let on_keydown = move |ev: ev::KeyboardEvent| {
        if ev.key() != "Tab" || ev.ctrl_key() || ev.meta_key() {
            return;
        }
        ev.prevent_default();
        let Some(area) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlTextAreaElement>().ok())
        else {
            return;
        };
        let Some(id) = active_id.get_untracked() else {
            return;
        };
        let value = area.value();
        let start = area.selection_start().ok().flatten().unwrap_or(0) as usize;
        let end = area.selection_end().ok().flatten().unwrap_or(0) as usize;
        // Selection offsets are UTF-16 units
        let to_byte = |units: usize| {
            value
                .char_indices()
                .scan(0usize, |acc, (i, c)| {
                    let here = *acc;
                    *acc += c.len_utf16();
                    Some((i, here))
                })
                .find(|&(_, u)| u >= units)
                .map(|(i, _)| i)
                .unwrap_or(value.len())
        };
        let (start_b, end_b) = (to_byte(start), to_byte(end));
        let updated = format!("{}{}{}", &value[..start_b], INDENT, &value[end_b..]);
        area.set_value(&updated);
        let caret = (start + INDENT.len()) as u32;
        let _ = area.set_selection_range(caret, caret);
        ctx.workspace.update(|ws| {
            ws.edit(&id, updated);
        });
    };

    let tab_view = move |(id, name, path, dirty, is_active): TabItem| {
        let class = if is_active {
            format!("{} {}", css::tab, css::tabActive)
        } else {
            css::tab.to_string()
        };
        let select_id = id.clone();
        view! {
            <div
                class=class
                title=path
                on:click=move |_| {
                    ctx.workspace.update(|ws| {
                        ws.tabs.select(&select_id);
                    });
                }
            >
                <span class=css::tabName>{name}</span>
                {dirty.then(|| view! { <span class=css::dirtyDot title="Unsaved changes"></span> })}
                <button
                    class=css::tabClose
                    title="Close"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        ctx.workspace.update(|ws| {
                            ws.tabs.close(&id);
                        });
                    }
                >
                    <Icon icon=ic::CLOSE />
                </button>
            </div>
        }
    };

    view! {
        <section class=css::editor>
            <div class=css::tabBar>
                <div class=css::tabs>
                    <For each=move || tabs.get() key=|tab| tab.clone() children=tab_view />
                </div>
                <div class=css::toolbar>
                    <button
                        class=css::toolButton
                        title="Save (Ctrl+S)"
                        disabled=move || active_id.get().is_none()
                        on:click=move |_| ctx.save_active()
                    >
                        <Icon icon=ic::SAVE />
                    </button>
                    <button
                        class=css::toolButton
                        title="Compile"
                        disabled=move || active_id.get().is_none() || ctx.compiling.get()
                        on:click=move |_| ctx.compile_active()
                    >
                        <Icon icon=ic::COMPILE />
                    </button>
                </div>
            </div>
            <Show
                when=move || active_id.get().is_some()
                fallback=|| view! {
                    <div class=css::empty>
                        <p>"No file open"</p>
                        <p class=css::hint>"Pick a file in the explorer to start editing."</p>
                    </div>
                }
            >
                <textarea
                    class=css::textarea
                    spellcheck="false"
                    autocomplete="off"
                    prop:value=content
                    on:input=on_input
                    on:keydown=on_keydown
                ></textarea>
            </Show>
        </section>
    }
}
