//! Project import dialog: pick or drop a folder, review the analysis, import.

use std::collections::HashSet;

use leptos::{ev, html, prelude::*};
use leptos_icons::Icon;
use web_sys::FileList;

use super::css;
use crate::app::AppContext;
use crate::components::icons as ic;
use crate::config::import::PROGRESS_TICK_MS;
use crate::core::file_tree::{self, OutlineRow};
use crate::core::import::{ImportStage, PreparedProject, ProjectImport, prepare};
use crate::models::LogLevel;
use crate::utils::upload::{files_of, read_file};
use crate::utils::{log, timer};

fn close(ctx: AppContext) {
    ctx.import.set(None);
    ctx.import_open.set(false);
}

/// Read the picked files, then analyse them.
fn analyze_files(ctx: AppContext, list: Option<FileList>) {
    let files = list.map(|l| files_of(&l)).unwrap_or_default();
    if files.is_empty() {
        return;
    }
    let mut import = ProjectImport::new();
    import.begin_reading(files.len());
    ctx.import.set(Some(import));

    wasm_bindgen_futures::spawn_local(async move {
        let mut uploads = Vec::with_capacity(files.len());
        for file in &files {
            uploads.push(read_file(file).await);
            let still_open = ctx
                .import
                .try_update(|slot| slot.as_mut().map(ProjectImport::file_read))
                .flatten();
            if still_open.is_none() {
                return;
            }
        }
        let project = prepare(&mut rand::thread_rng(), uploads);
        log::info(&format!(
            "Analysed {} files ({} skipped)",
            project.analysis.total_files, project.skipped
        ));
        ctx.import.try_update(|slot| {
            if let Some(import) = slot {
                import.analyzed(project);
            }
        });
    });
}

/// Run the progress bar, then swap the project into the workspace.
fn run_import(ctx: AppContext) {
    match ctx
        .import
        .try_update(|slot| slot.as_mut().map(ProjectImport::start_import))
        .flatten()
    {
        Some(Ok(())) => {}
        Some(Err(e)) => {
            ctx.notify(e.to_string());
            return;
        }
        None => return,
    }

    wasm_bindgen_futures::spawn_local(async move {
        loop {
            timer::sleep(PROGRESS_TICK_MS).await;
            match ctx
                .import
                .try_update(|slot| slot.as_mut().map(ProjectImport::tick))
                .flatten()
            {
                Some(true) => break,
                Some(false) => {}
                None => return,
            }
        }
        let project = ctx
            .import
            .try_update(|slot| slot.as_mut().and_then(ProjectImport::finish))
            .flatten();
        if let Some(project) = project {
            install(ctx, project);
        }
        close(ctx);
    });
}

fn install(ctx: AppContext, project: PreparedProject) {
    let count = project.analysis.total_files;
    let opened = ctx
        .workspace
        .try_update(|ws| ws.replace_project(&mut rand::thread_rng(), project.files))
        .flatten();

    log::info(&format!("Imported project with {} files", count));
    ctx.log_line(LogLevel::Success, "Project imported successfully");
    ctx.log_line(LogLevel::Info, format!("Imported {} files", count));
    if let Some(path) = opened {
        ctx.log_line(LogLevel::Info, format!("Opened {}", path));
    }
    ctx.notify(format!("Imported {} files", count));
}

#[component]
fn UploadStage() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");
    let folder_input = NodeRef::<html::Input>::new();
    let files_input = NodeRef::<html::Input>::new();
    let drag_over = RwSignal::new(false);

    let on_change = move |ev: ev::Event| {
        let input = event_target::<web_sys::HtmlInputElement>(&ev);
        analyze_files(ctx, input.files());
        input.set_value("");
    };
    let on_drop = move |ev: ev::DragEvent| {
        ev.prevent_default();
        drag_over.set(false);
        analyze_files(ctx, ev.data_transfer().and_then(|dt| dt.files()));
    };
    let zone_class = move || {
        if drag_over.get() {
            format!("{} {}", css::dropZone, css::dropZoneActive)
        } else {
            css::dropZone.to_string()
        }
    };

    view! {
        <div
            class=zone_class
            on:dragover=move |ev: ev::DragEvent| {
                ev.prevent_default();
                drag_over.set(true);
            }
            on:dragleave=move |ev: ev::DragEvent| {
                ev.prevent_default();
                drag_over.set(false);
            }
            on:drop=on_drop
        >
            <Icon icon=ic::IMPORT />
            <div class=css::sectionTitle>
                {move || {
                    if drag_over.get() {
                        "Drop your project folder here"
                    } else {
                        "Drag & drop your project folder"
                    }
                }}
            </div>
            <div class=css::hint>"Scarb projects, cairo_project.toml projects or loose .cairo files"</div>
            <div class=css::buttonRow>
                <button
                    class=css::primaryButton
                    on:click=move |_| {
                        if let Some(input) = folder_input.get() {
                            input.click();
                        }
                    }
                >
                    <Icon icon=ic::FOLDER_OPEN />
                    " Select folder"
                </button>
                <button
                    class=css::secondaryButton
                    on:click=move |_| {
                        if let Some(input) = files_input.get() {
                            input.click();
                        }
                    }
                >
                    <Icon icon=ic::FILE />
                    " Select files"
                </button>
            </div>
            <input
                node_ref=folder_input
                class=css::hidden
                type="file"
                multiple=true
                {..leptos::tachys::html::attribute::custom::custom_attribute("webkitdirectory", "")}
                on:change=on_change
            />
            <input
                node_ref=files_input
                class=css::hidden
                type="file"
                multiple=true
                accept=".cairo,.toml,.md,.txt,.json"
                on:change=on_change
            />
        </div>
    }
}

fn stat(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div class=css::stat>
            <span class=css::statLabel>{label}</span>
            <span class=css::statValue>{value}</span>
        </div>
    }
}

fn preview_row(row: OutlineRow, is_contract: bool) -> impl IntoView {
    let icon = if row.is_folder { ic::FOLDER_OPEN } else { ic::FILE };
    let is_cairo = !row.is_folder && row.name.ends_with(".cairo");
    view! {
        <div class=css::previewRow style=format!("padding-left: {}px", row.depth * 16)>
            <Icon icon=icon />
            <span>{row.name}</span>
            {is_cairo.then(|| view! { <span class=css::badge>"Cairo"</span> })}
            {is_contract.then(|| view! { <span class=css::badge>"Contract"</span> })}
        </div>
    }
}

#[component]
fn ConfirmStage(project: PreparedProject) -> impl IntoView {
    let analysis = project.analysis.clone();
    let dependencies = if analysis.dependencies.is_empty() {
        "none".to_string()
    } else {
        analysis.dependencies.join(", ")
    };
    let rows: Vec<_> = file_tree::outline(&project.files, &HashSet::new())
        .into_iter()
        .map(|row| {
            let is_contract = file_tree::find(&project.files, &row.path)
                .and_then(|n| n.content.as_deref())
                .is_some_and(|c| c.contains("#[starknet::contract]"));
            (row, is_contract)
        })
        .collect();

    view! {
        <div class=css::section>
            <div class=css::sectionTitle>
                "Project analysis "
                <span class=css::badge>{analysis.project_type.label()}</span>
            </div>
            <div class=css::statGrid>
                {stat("Total files", analysis.total_files.to_string())}
                {stat("Cairo files", analysis.cairo_files.to_string())}
                {stat("Contracts", analysis.contracts.to_string())}
                {stat("Size", analysis.estimated_size())}
                {stat("Dependencies", dependencies)}
                {stat("Skipped", project.skipped.to_string())}
            </div>
        </div>
        <div class=css::section>
            <div class=css::sectionTitle>"Files"</div>
            <div class=css::preview>
                {rows
                    .into_iter()
                    .map(|(row, is_contract)| preview_row(row, is_contract))
                    .collect_view()}
            </div>
        </div>
        {(analysis.total_files > 0)
            .then(|| {
                view! {
                    <div class=css::hint>"Importing replaces the current project and closes all tabs."</div>
                }
            })}
    }
}

#[component]
pub fn ImportDialog() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");

    let stage = Memo::new(move |_| {
        ctx.import
            .with(|i| i.as_ref().map(ProjectImport::stage))
            .unwrap_or_default()
    });
    let progress = move || {
        ctx.import
            .with(|i| i.as_ref().map(ProjectImport::progress))
            .unwrap_or(0)
    };
    let busy = move || {
        matches!(
            stage.get(),
            ImportStage::Analyzing { .. } | ImportStage::Importing { .. } | ImportStage::Done
        )
    };

    let body = move || match stage.get() {
        ImportStage::Upload => view! { <UploadStage /> }.into_any(),
        ImportStage::Analyzing { read, total } => view! {
            <div class=css::section>
                <div class=css::sectionTitle>"Analyzing project"</div>
                <div class=css::hint>{format!("Read {} of {} files", read, total)}</div>
                <div class=css::progressTrack>
                    <div class=css::progressFill style=move || format!("width: {}%", progress())></div>
                </div>
            </div>
        }
        .into_any(),
        ImportStage::Confirm => ctx
            .import
            .with_untracked(|i| i.as_ref().and_then(|i| i.project().cloned()))
            .map(|project| view! { <ConfirmStage project=project /> }.into_any())
            .unwrap_or_else(|| ().into_any()),
        ImportStage::Importing { .. } | ImportStage::Done => view! {
            <div class=css::section>
                <div class=css::sectionTitle>"Importing project"</div>
                <div class=css::progressTrack>
                    <div class=css::progressFill style=move || format!("width: {}%", progress())></div>
                </div>
            </div>
        }
        .into_any(),
    };

    view! {
        <Show when=move || ctx.import_open.get() fallback=|| ()>
            <div class=css::backdrop>
                <div class=css::dialog role="dialog">
                    <header class=css::dialogHeader>
                        <Icon icon=ic::IMPORT />
                        <span class=css::dialogTitle>"Import Cairo project"</span>
                    </header>

                    {body}

                    <footer class=css::dialogFooter>
                        <Show when=move || { stage.get() == ImportStage::Confirm } fallback=|| ()>
                            <button
                                class=css::secondaryButton
                                on:click=move |_| {
                                    ctx.import.update(|slot| {
                                        if let Some(import) = slot {
                                            import.restart();
                                        }
                                    });
                                }
                            >
                                "Back"
                            </button>
                        </Show>
                        <div class=css::spacer></div>
                        <button class=css::secondaryButton disabled=busy on:click=move |_| close(ctx)>
                            "Cancel"
                        </button>
                        <Show when=move || { stage.get() == ImportStage::Confirm } fallback=|| ()>
                            <button
                                class=css::primaryButton
                                disabled=move || {
                                    ctx.import
                                        .with(|i| {
                                            i.as_ref()
                                                .and_then(|i| i.project())
                                                .is_none_or(|p| p.analysis.total_files == 0)
                                        })
                                }
                                on:click=move |_| run_import(ctx)
                            >
                                <Icon icon=ic::IMPORT />
                                " Import"
                            </button>
                        </Show>
                    </footer>
                </div>
            </div>
        </Show>
    }
}
