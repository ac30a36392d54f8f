//! Shell input line: history recall, Tab completion and ghost-text hints.

use leptos::{ev, prelude::*};

use super::hooks::{HintState, SuggestionState};
use crate::core::terminal::{AutocompleteResult, autocomplete, get_hint};

stylance::import_crate_style!(css, "src/components/terminal/input.module.css");

/// What a key press asks the input line to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KeyAction {
    Complete,
    Submit,
    Recall(i32),
    AcceptHint,
    Discard,
    ClearScreen,
    Dismiss,
    Typing,
}

fn classify(ev: &ev::KeyboardEvent) -> KeyAction {
    match (ev.key().as_str(), ev.ctrl_key()) {
        ("Tab", _) => KeyAction::Complete,
        ("Enter", _) => KeyAction::Submit,
        ("ArrowUp", _) => KeyAction::Recall(-1),
        ("ArrowDown", _) => KeyAction::Recall(1),
        ("ArrowRight", _) => KeyAction::AcceptHint,
        ("c", true) => KeyAction::Discard,
        ("l", true) => KeyAction::ClearScreen,
        ("Escape", _) => KeyAction::Dismiss,
        _ => KeyAction::Typing,
    }
}

/// Shell input line.
///
/// History and screen clearing are delegated to the session manager through
/// callbacks; completion runs locally against the command list.
#[component]
pub fn Input(
    #[prop(into)] prompt: Signal<String>,
    /// A deferred command is running; input is disabled until it finishes
    #[prop(into)]
    busy: Signal<bool>,
    on_submit: Callback<String>,
    on_history_nav: Callback<i32, Option<String>>,
    on_clear: Callback<()>,
) -> impl IntoView {
    let input_ref = NodeRef::<leptos::html::Input>::new();
    let value = RwSignal::new(String::new());
    let suggestions = SuggestionState::new();
    let hint = HintState::new();

    // Refocus whenever the session becomes free again
    Effect::new(move || {
        if !busy.get()
            && let Some(input) = input_ref.get()
        {
            let _ = input.focus();
        }
    });

    // Replace the line and park the caret at its end
    let replace = move |text: String| {
        suggestions.clear();
        hint.set(get_hint(&text));
        value.set(text);
        if let Some(input) = input_ref.get_untracked() {
            let end = value.with_untracked(|v| v.encode_utf16().count()) as u32;
            let _ = input.set_selection_range(end, end);
        }
    };

    let caret_at_end = move || {
        input_ref.get_untracked().is_some_and(|input| {
            let caret = input.selection_start().ok().flatten().unwrap_or(0) as usize;
            caret == value.with_untracked(|v| v.encode_utf16().count())
        })
    };

    let on_keydown = move |ev: ev::KeyboardEvent| match classify(&ev) {
        KeyAction::Complete => {
            ev.prevent_default();
            match autocomplete(&value.get_untracked()) {
                AutocompleteResult::Single(completed) => replace(completed),
                AutocompleteResult::Multiple(matches) => {
                    hint.clear();
                    suggestions.show(matches);
                }
                AutocompleteResult::None => {}
            }
        }
        KeyAction::Submit => {
            let line = value.get_untracked();
            replace(String::new());
            on_submit.run(line);
        }
        KeyAction::Recall(direction) => {
            ev.prevent_default();
            let recalled = on_history_nav.run(direction);
            if direction > 0 || recalled.is_some() {
                replace(recalled.unwrap_or_default());
            }
        }
        KeyAction::AcceptHint => {
            if let Some(rest) = hint.hint.get_untracked()
                && caret_at_end()
            {
                ev.prevent_default();
                replace(format!("{}{}", value.get_untracked(), rest));
            }
        }
        KeyAction::Discard => replace(String::new()),
        KeyAction::ClearScreen => {
            ev.prevent_default();
            suggestions.clear();
            on_clear.run(());
        }
        KeyAction::Dismiss => {
            suggestions.clear();
            hint.clear();
        }
        KeyAction::Typing => suggestions.clear(),
    };

    let on_input = move |ev: ev::Event| {
        let text = event_target_value(&ev);
        suggestions.clear();
        hint.set(get_hint(&text));
        value.set(text);
    };

    let suggestion_list = move || {
        let matches = suggestions.matches.get();
        (!matches.is_empty()).then(|| {
            view! {
                <div class=css::suggestions>
                    {matches
                        .into_iter()
                        .map(|candidate| {
                            let label = candidate.clone();
                            view! {
                                <span
                                    class=css::suggestion
                                    on:mousedown=move |ev: ev::MouseEvent| {
                                        ev.prevent_default();
                                        replace(candidate.clone());
                                    }
                                >
                                    {label}
                                </span>
                            }
                        })
                        .collect_view()}
                </div>
            }
        })
    };

    view! {
        <div class=css::inputWrapper>
            <div class=css::line>
                <span class=css::prompt>{prompt}</span>
                <span class=css::separator>"$ "</span>
                <div class=css::field>
                    // Typed text is mirrored so the hint lines up after it
                    <div class=css::ghostOverlay>
                        <span class=css::ghostText>{move || value.get()}</span>
                        <span class=css::ghostHint>{move || hint.get().unwrap_or_default()}</span>
                    </div>
                    <input
                        node_ref=input_ref
                        type="text"
                        class=css::input
                        autocomplete="off"
                        spellcheck="false"
                        data-terminal=""
                        disabled=busy
                        prop:value=move || value.get()
                        on:input=on_input
                        on:keydown=on_keydown
                    />
                </div>
            </div>
            {suggestion_list}
        </div>
    }
}
