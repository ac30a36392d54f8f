use leptos::prelude::*;

use crate::models::{EntryKind, TerminalEntry};
use crate::utils::format::format_time;

stylance::import_crate_style!(css, "src/components/terminal/output.module.css");

#[component]
pub fn Output(entry: TerminalEntry) -> impl IntoView {
    match entry.kind {
        EntryKind::Command => view! {
            <div class=format!("{} {}", css::line, css::command)>{entry.text}</div>
        }
        .into_any(),
        EntryKind::Output => view! {
            <pre class=format!("{} {}", css::line, css::textFg)>{entry.text}</pre>
        }
        .into_any(),
        EntryKind::Error => {
            let code = entry.exit_code.map(|c| format!(" [exit {}]", c));
            view! {
                <pre class=format!("{} {}", css::line, css::textRed)>
                    {entry.text}
                    <span class=css::textDim>{code}</span>
                </pre>
            }
            .into_any()
        }
        EntryKind::System => view! {
            <div class=format!("{} {}", css::line, css::textYellow)>{entry.text}</div>
        }
        .into_any(),
        EntryKind::Log => view! {
            <div class=css::line>
                <span class=css::textDim>{format_time(entry.timestamp)}" "</span>
                <span class=css::textFg>{entry.text}</span>
            </div>
        }
        .into_any(),
    }
}
