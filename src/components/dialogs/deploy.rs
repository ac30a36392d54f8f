//! Deployment dialog.
//!
//! Manual deployments advance one step per click. Smart deployments run to
//! the end once started, retrying transient failures on their own. A failed
//! deployment can be retried from the failing step or exported as a report.

use leptos::prelude::*;
use leptos_icons::Icon;

use super::css;
use super::progress::{ErrorDetail, LogList, StepList};
use crate::app::AppContext;
use crate::components::icons as ic;
use crate::core::deploy::{DeployMode, Deployment, WorkflowState, run_step, run_to_end};
use crate::models::LogLevel;
use crate::utils::dom::now_ms;
use crate::utils::{BrowserDelay, download_json, download_text, log};

/// Tracked read of the open deployment.
fn read<T>(ctx: AppContext, f: impl FnOnce(&Deployment) -> T) -> Option<T> {
    ctx.deployment.with(|d| d.as_ref().map(f))
}

/// Publish the outcome of a finished deployment to the IDE log stream.
///
/// `posted` counts workflow log lines already published, so a retried
/// deployment only adds its new lines.
fn report(ctx: AppContext, posted: RwSignal<usize>) {
    let Some((state, name, address, logs)) = ctx.deployment.with_untracked(|d| {
        d.as_ref().map(|d| {
            (
                d.workflow.state(),
                d.target.contract.name.clone(),
                d.artifacts.contract_address.clone(),
                d.workflow.logs().to_vec(),
            )
        })
    }) else {
        return;
    };

    let fresh = || {
        let from = posted.get_untracked().min(logs.len());
        posted.set(logs.len());
        logs[from..].to_vec()
    };

    match state {
        WorkflowState::Succeeded => {
            let address = address.unwrap_or_default();
            log::info(&format!("Deployed {} at {}", name, address));
            ctx.log(fresh());
            ctx.notify(format!("{} deployed", name));
        }
        WorkflowState::Failed => {
            log::warn(&format!("Deployment of {} failed", name));
            ctx.log(fresh());
            ctx.log_line(LogLevel::Error, format!("Deployment of {} failed", name));
            ctx.notify(format!("Deployment of {} failed", name));
        }
        WorkflowState::Idle | WorkflowState::Running => {}
    }
}

#[component]
pub fn DeployDialog() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");
    let is_open = move || ctx.deployment.with(Option::is_some);

    view! {
        <Show when=is_open fallback=|| ()>
            <DeployBody />
        </Show>
    }
}

#[component]
fn DeployBody() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");
    // A driver future holds the deployment signal
    let driving = RwSignal::new(false);
    let posted = RwSignal::new(0usize);

    let title = move || {
        read(ctx, |d| format!("{} → {}", d.target.contract.name, d.target.network.name()))
            .unwrap_or_default()
    };
    let mode = Memo::new(move |_| read(ctx, |d| d.mode).unwrap_or(DeployMode::Manual));
    let state = Memo::new(move |_| read(ctx, |d| d.workflow.state()).unwrap_or(WorkflowState::Idle));
    let steps = Signal::derive(move || read(ctx, |d| d.workflow.steps().to_vec()).unwrap_or_default());
    let progress = Signal::derive(move || read(ctx, |d| d.workflow.progress()).unwrap_or(0));
    let logs = Signal::derive(move || read(ctx, |d| d.workflow.logs().to_vec()).unwrap_or_default());
    let error = move || read(ctx, |d| d.workflow.error().cloned()).flatten();
    let artifacts = move || read(ctx, |d| d.artifacts.clone()).unwrap_or_default();
    let explorer = move || read(ctx, Deployment::explorer_link).flatten();
    let args = Memo::new(move |_| {
        read(ctx, |d| {
            d.target
                .contract
                .constructor_args
                .iter()
                .cloned()
                .zip(d.target.constructor_values.iter().cloned())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default()
    });
    let next_label = move || {
        read(ctx, |d| d.workflow.current_step().map(|s| s.label))
            .flatten()
            .unwrap_or("Done")
    };

    let drive = move || {
        if driving.get_untracked() || state.get_untracked().is_finished() {
            return;
        }
        driving.set(true);
        let mode = mode.get_untracked();
        wasm_bindgen_futures::spawn_local(async move {
            let mut rng = rand::thread_rng();
            match mode {
                DeployMode::Smart => {
                    run_to_end::<Deployment, _, _, _>(&ctx.deployment, &BrowserDelay, &mut rng)
                        .await
                }
                DeployMode::Manual => {
                    run_step::<Deployment, _, _, _>(&ctx.deployment, &BrowserDelay, &mut rng).await;
                }
            }
            driving.try_set(false);
            report(ctx, posted);
        });
    };

    let retry = move |_| {
        if driving.get_untracked() {
            return;
        }
        let retried = ctx
            .deployment
            .try_update(|d| d.as_mut().map(|d| d.retry(now_ms())))
            .flatten()
            .unwrap_or(false);
        if retried && mode.get_untracked() == DeployMode::Smart {
            drive();
        }
    };

    let export_report = move |_| {
        let Some(json) = read(ctx, |d| d.error_report_json(now_ms())) else {
            return;
        };
        let result = json
            .map_err(|e| format!("{}", e))
            .and_then(|json| {
                download_json(&format!("cairo-ide-deployment-error-{}.json", now_ms()), &json)
                    .map_err(|e| format!("{:?}", e))
            });
        if let Err(e) = result {
            log::error(&format!("Report export failed: {}", e));
            ctx.notify("Report export failed");
        }
    };

    let export = move |_| {
        let Some((name, text)) =
            read(ctx, |d| (d.target.contract.name.clone(), d.workflow.export_logs()))
        else {
            return;
        };
        if let Err(e) = download_text(&format!("deploy-{}.log", name.to_lowercase()), &text) {
            log::error(&format!("Log export failed: {:?}", e));
            ctx.notify("Log export failed");
        }
    };

    let close = move |_| {
        if !driving.get_untracked() {
            ctx.deployment.set(None);
        }
    };

    let action_label = move || match (mode.get(), state.get()) {
        (DeployMode::Smart, WorkflowState::Idle) => "Start deployment".to_string(),
        (DeployMode::Smart, _) => "Deploying...".to_string(),
        (DeployMode::Manual, _) => format!("Run: {}", next_label()),
    };

    view! {
        <div class=css::backdrop>
            <div class=css::dialog role="dialog">
                <header class=css::dialogHeader>
                    <Icon icon=ic::DEPLOY />
                    <span class=css::dialogTitle>{title}</span>
                    <span class=css::badge>
                        {move || match mode.get() {
                            DeployMode::Manual => "Manual",
                            DeployMode::Smart => "Smart",
                        }}
                    </span>
                </header>

                <Show when=move || !args.with(Vec::is_empty) fallback=|| ()>
                    <div class=css::section>
                        <div class=css::sectionTitle>"Constructor arguments"</div>
                        {move || {
                            args.get()
                                .into_iter()
                                .enumerate()
                                .map(|(i, ((name, ty), value))| {
                                    view! {
                                        <label class=css::argRow>
                                            <span class=css::argName>{name}": "{ty}</span>
                                            <input
                                                class=css::input
                                                prop:value=value
                                                disabled=move || state.get() != WorkflowState::Idle
                                                on:change=move |ev| {
                                                    let value = event_target_value(&ev);
                                                    ctx.deployment.update(|d| {
                                                        if let Some(slot) = d
                                                            .as_mut()
                                                            .and_then(|d| d.target.constructor_values.get_mut(i))
                                                        {
                                                            *slot = value;
                                                        }
                                                    });
                                                }
                                            />
                                        </label>
                                    }
                                })
                                .collect_view()
                        }}
                    </div>
                </Show>

                <div class=css::section>
                    <StepList steps=steps progress=progress />
                </div>

                {move || {
                    error()
                        .map(|e| {
                            let technical = read(ctx, Deployment::technical_details).flatten();
                            view! { <ErrorDetail error=e technical=technical /> }
                        })
                }}

                <Show when=move || { state.get() == WorkflowState::Succeeded } fallback=|| ()>
                    <div class=css::artifacts>
                        {move || {
                            let a = artifacts();
                            [
                                ("Account", a.account),
                                ("Class hash", a.class_hash),
                                ("Declare tx", a.declare_tx),
                                ("Contract address", a.contract_address),
                                ("Deploy tx", a.deploy_tx),
                            ]
                                .into_iter()
                                .filter_map(|(label, value)| value.map(|v| (label, v)))
                                .map(|(label, value)| {
                                    view! {
                                        <div class=css::artifact>
                                            <span class=css::artifactLabel>{label}</span>
                                            <code class=css::artifactValue>{value}</code>
                                        </div>
                                    }
                                })
                                .collect_view()
                        }}
                        {move || {
                            explorer()
                                .map(|href| {
                                    view! {
                                        <a class=css::link href=href target="_blank" rel="noopener">
                                            "View on explorer"
                                        </a>
                                    }
                                })
                        }}
                    </div>
                </Show>

                <div class=css::section>
                    <div class=css::sectionTitle>"Logs"</div>
                    <LogList logs=logs />
                </div>

                <footer class=css::dialogFooter>
                    <button class=css::secondaryButton on:click=export>
                        <Icon icon=ic::DOWNLOAD />" Export logs"
                    </button>
                    <Show when=move || { state.get() == WorkflowState::Failed } fallback=|| ()>
                        <button class=css::secondaryButton on:click=export_report>
                            <Icon icon=ic::DOWNLOAD />" Export report"
                        </button>
                    </Show>
                    <div class=css::spacer></div>
                    <button
                        class=css::secondaryButton
                        disabled=move || driving.get()
                        on:click=close
                    >
                        "Close"
                    </button>
                    <Show when=move || { state.get() == WorkflowState::Failed } fallback=|| ()>
                        <button
                            class=css::secondaryButton
                            disabled=move || driving.get()
                            on:click=retry
                        >
                            <Icon icon=ic::RETRY />" Retry"
                        </button>
                    </Show>
                    <button
                        class=css::primaryButton
                        disabled=move || driving.get() || state.get().is_finished()
                        on:click=move |_| drive()
                    >
                        <Icon icon=ic::PLAY />
                        " "
                        {action_label}
                    </button>
                </footer>
            </div>
        </div>
    }
}
