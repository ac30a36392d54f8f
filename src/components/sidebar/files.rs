//! Explorer panel: project tree with create, rename and delete.

use std::collections::HashSet;

use leptos::{ev, prelude::*};
use leptos_icons::Icon;

use super::css;
use crate::app::AppContext;
use crate::components::icons as ic;
use crate::core::file_tree::{self, OutlineRow};
use crate::models::parent_path;

/// Pending inline name entry.
#[derive(Clone, Debug, PartialEq)]
enum NameEdit {
    NewFile { parent: Option<String> },
    NewFolder { parent: Option<String> },
    Rename { path: String },
}

impl NameEdit {
    fn placeholder(&self) -> &'static str {
        match self {
            Self::NewFile { .. } => "file name",
            Self::NewFolder { .. } => "folder name",
            Self::Rename { .. } => "new name",
        }
    }
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[component]
pub fn FilesPanel() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");

    let collapsed = RwSignal::new(HashSet::<String>::new());
    let selected = RwSignal::new(None::<String>);
    let editing = RwSignal::new(None::<NameEdit>);
    let draft = RwSignal::new(String::new());

    // Only structural changes re-render the tree, not content edits
    let rows = Memo::new(move |_| {
        ctx.workspace
            .with(|ws| collapsed.with(|c| file_tree::outline(&ws.files, c)))
    });
    let active_path = Memo::new(move |_| {
        ctx.workspace
            .with(|ws| ws.tabs.active().map(|t| t.path.clone()))
    });

    // New entries go into the selected folder, or next to the selected file
    let target_folder = move || {
        let path = selected.get_untracked()?;
        ctx.workspace.with_untracked(|ws| {
            match file_tree::find(&ws.files, &path) {
                Some(node) if node.is_folder() => Some(path.clone()),
                Some(_) => parent_path(&path).map(str::to_string),
                None => None,
            }
        })
    };

    let begin = move |edit: NameEdit| {
        draft.set(match &edit {
            NameEdit::Rename { path } => path.rsplit('/').next().unwrap_or_default().to_string(),
            _ => String::new(),
        });
        editing.set(Some(edit));
    };

    let commit = move || {
        let Some(edit) = editing.get_untracked() else {
            return;
        };
        let name = draft.get_untracked();
        let mut rng = rand::thread_rng();
        let done = match edit {
            NameEdit::NewFile { parent } => ctx
                .mutate(|ws| ws.create_file(&mut rng, parent.as_deref(), &name))
                .map(|path| selected.set(Some(path))),
            NameEdit::NewFolder { parent } => ctx
                .mutate(|ws| ws.create_folder(&mut rng, parent.as_deref(), &name))
                .map(|path| selected.set(Some(path))),
            NameEdit::Rename { path } => ctx
                .mutate(|ws| ws.rename(&path, &name))
                .map(|new_path| selected.set(Some(new_path))),
        };
        if done.is_some() {
            editing.set(None);
        }
    };

    let on_edit_key = move |ev: ev::KeyboardEvent| match ev.key().as_str() {
        "Enter" => commit(),
        "Escape" => editing.set(None),
        _ => {}
    };

    let delete = move |path: String| {
        if !confirm(&format!("Delete {}?", path)) {
            return;
        }
        if ctx.mutate(|ws| ws.delete(&path)).is_some() {
            selected.set(None);
            ctx.notify(format!("Deleted {}", path));
        }
    };

    let row_view = move |row: OutlineRow| {
        let path = row.path.clone();
        let indent = format!("padding-left: {}px", 8 + row.depth * 14);
        let is_active = {
            let path = path.clone();
            move || active_path.get().as_deref() == Some(path.as_str())
        };
        let is_selected = {
            let path = path.clone();
            move || selected.get().as_deref() == Some(path.as_str())
        };
        let row_class = move || {
            let mut class = css::row.to_string();
            if is_active() || is_selected() {
                class.push(' ');
                class.push_str(css::rowActive);
            }
            class
        };
        let (icon, chevron) = match (row.is_folder, row.expanded) {
            (true, true) => (ic::FOLDER_OPEN, Some(ic::CHEVRON_DOWN)),
            (true, false) => (ic::FOLDER, Some(ic::CHEVRON_RIGHT)),
            _ => (ic::FILE, None),
        };

        let on_click = {
            let path = path.clone();
            move |_: ev::MouseEvent| {
                selected.set(Some(path.clone()));
                if row.is_folder {
                    collapsed.update(|c| {
                        if !c.remove(&path) {
                            c.insert(path.clone());
                        }
                    });
                } else {
                    ctx.open_file(&path);
                }
            }
        };
        let on_rename = {
            let path = path.clone();
            move |ev: ev::MouseEvent| {
                ev.stop_propagation();
                begin(NameEdit::Rename { path: path.clone() });
            }
        };
        let on_delete = move |ev: ev::MouseEvent| {
            ev.stop_propagation();
            delete(path.clone());
        };

        view! {
            <div class=row_class style=indent on:click=on_click title=row.path.clone()>
                <span class=css::chevron>{chevron.map(|i| view! { <Icon icon=i /> })}</span>
                <span class=css::rowIcon><Icon icon=icon /></span>
                <span class=css::rowName>{row.name}</span>
                <span class=css::rowActions>
                    <button class=css::iconButton title="Rename" on:click=on_rename>
                        <Icon icon=ic::RENAME />
                    </button>
                    <button class=css::iconButton title="Delete" on:click=on_delete>
                        <Icon icon=ic::TRASH />
                    </button>
                </span>
            </div>
        }
    };

    view! {
        <div class=css::panel>
            <div class=css::header>
                <span class=css::title>{move || ctx.active_panel.get().title()}</span>
                <div class=css::headerActions>
                    <button
                        class=css::iconButton
                        title="New file"
                        on:click=move |_| begin(NameEdit::NewFile { parent: target_folder() })
                    >
                        <Icon icon=ic::FILE_PLUS />
                    </button>
                    <button
                        class=css::iconButton
                        title="New folder"
                        on:click=move |_| begin(NameEdit::NewFolder { parent: target_folder() })
                    >
                        <Icon icon=ic::FOLDER_PLUS />
                    </button>
                    <button
                        class=css::iconButton
                        title="Import project"
                        on:click=move |_| ctx.import_open.set(true)
                    >
                        <Icon icon=ic::IMPORT />
                    </button>
                </div>
            </div>

            {move || {
                editing.get().map(|edit| {
                    view! {
                        <div class=css::nameEditor>
                            <input
                                class=css::textInput
                                placeholder=edit.placeholder()
                                prop:value=move || draft.get()
                                on:input=move |ev| draft.set(event_target_value(&ev))
                                on:keydown=on_edit_key
                                on:blur=move |_| editing.set(None)
                                autofocus=true
                            />
                        </div>
                    }
                })
            }}

            <div class=css::tree on:click=move |_| selected.set(None)>
                <For
                    each=move || rows.get()
                    key=|row| row.clone()
                    children=move |row| {
                        view! { <div on:click=|ev: ev::MouseEvent| ev.stop_propagation()>{row_view(row)}</div> }
                    }
                />
            </div>
        </div>
    }
}
