//! Sidebar panels selected from the activity bar.

mod deploy;
mod files;
mod search;

use leptos::prelude::*;

use crate::app::AppContext;
use crate::models::ActivePanel;

use deploy::DeployPanel;
use files::FilesPanel;
use search::SearchPanel;

stylance::import_crate_style!(css, "src/components/sidebar/sidebar.module.css");

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");

    view! {
        <aside class=css::sidebar style=move || format!("width: {}px", ctx.sidebar_width.get())>
            {move || match ctx.active_panel.get() {
                ActivePanel::Files => view! { <FilesPanel /> }.into_any(),
                ActivePanel::Search => view! { <SearchPanel /> }.into_any(),
                ActivePanel::Deploy => view! { <DeployPanel /> }.into_any(),
            }}
        </aside>
    }
}
