//! Search panel: case-insensitive text search over file contents.

use leptos::prelude::*;
use leptos_icons::Icon;

use super::css;
use crate::app::AppContext;
use crate::components::icons as ic;
use crate::core::file_tree::{SearchHit, search};

#[component]
pub fn SearchPanel() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");
    let query = RwSignal::new(String::new());

    let hits = Memo::new(move |_| {
        let query = query.get();
        ctx.workspace.with(|ws| search(&ws.files, &query))
    });
    let summary = move || {
        let count = hits.with(Vec::len);
        match (query.with(|q| q.trim().is_empty()), count) {
            (true, _) => String::new(),
            (false, 0) => "No results".to_string(),
            (false, 1) => "1 result".to_string(),
            (false, n) => format!("{} results", n),
        }
    };

    view! {
        <div class=css::panel>
            <div class=css::header>
                <span class=css::title>"Search"</span>
            </div>
            <div class=css::searchBox>
                <span class=css::rowIcon><Icon icon=ic::SEARCH /></span>
                <input
                    class=css::textInput
                    placeholder="Search files"
                    prop:value=move || query.get()
                    on:input=move |ev| query.set(event_target_value(&ev))
                />
            </div>
            <div class=css::muted>{summary}</div>
            <div class=css::tree>
                <For
                    each=move || hits.get()
                    key=|hit| (hit.path.clone(), hit.line)
                    children=move |hit: SearchHit| {
                        let path = hit.path.clone();
                        view! {
                            <div class=css::hit on:click=move |_| ctx.open_file(&path)>
                                <div class=css::hitPath>{format!("{}:{}", hit.path, hit.line)}</div>
                                <div class=css::hitText>{hit.text}</div>
                            </div>
                        }
                    }
                />
            </div>
        </div>
    }
}
