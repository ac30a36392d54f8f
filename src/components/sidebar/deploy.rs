//! Deploy panel: network selection and detected contracts.

use leptos::prelude::*;
use leptos_icons::Icon;

use super::css;
use crate::app::AppContext;
use crate::components::icons as ic;
use crate::core::deploy::{DeployMode, DeployTarget, Deployment, detect_contracts};
use crate::models::{DetectedContract, Network};
use crate::utils::dom::now_ms;

/// Open the deployment dialog for `contract`.
fn open_deployment(ctx: AppContext, contract: DetectedContract, mode: DeployMode) {
    let source = ctx
        .workspace
        .with_untracked(|ws| ws.current_content(&contract.path))
        .unwrap_or_default();
    let target = DeployTarget {
        constructor_values: vec![String::new(); contract.constructor_args.len()],
        contract,
        source,
        network: ctx.network.get_untracked(),
    };
    ctx.deployment
        .set(Some(Deployment::new(mode, target, now_ms())));
}

#[component]
pub fn DeployPanel() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");

    let contracts = Memo::new(move |_| ctx.workspace.with(|ws| detect_contracts(&ws.files)));

    view! {
        <div class=css::panel>
            <div class=css::header>
                <span class=css::title>"Deploy & Interact"</span>
            </div>

            <label class=css::field>
                <span class=css::fieldLabel><Icon icon=ic::NETWORK />" Network"</span>
                <select
                    class=css::select
                    on:change=move |ev| {
                        if let Some(network) = Network::from_name(&event_target_value(&ev)) {
                            ctx.network.set(network);
                        }
                    }
                >
                    {Network::ALL
                        .into_iter()
                        .map(|n| {
                            view! {
                                <option value=n.name() selected=move || ctx.network.get() == n>
                                    {n.name()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </label>

            <button class=css::primaryButton on:click=move |_| ctx.compile_active()>
                <Icon icon=ic::COMPILE />
                {move || if ctx.compiling.get() { " Compiling..." } else { " Compile active file" }}
            </button>

            <div class=css::sectionTitle>"Contracts"</div>
            <Show
                when=move || contracts.with(|c| !c.is_empty())
                fallback=|| view! {
                    <div class=css::muted>"No #[starknet::contract] modules found."</div>
                }
            >
                <For
                    each=move || contracts.get()
                    key=|c| (c.path.clone(), c.name.clone())
                    children=move |contract: DetectedContract| {
                        let manual = contract.clone();
                        let smart = contract.clone();
                        view! {
                            <div class=css::contract>
                                <div class=css::contractName>{contract.name.clone()}</div>
                                <div class=css::muted>{contract.path.clone()}</div>
                                <div class=css::contractActions>
                                    <button
                                        class=css::secondaryButton
                                        on:click=move |_| open_deployment(ctx, manual.clone(), DeployMode::Manual)
                                    >
                                        <Icon icon=ic::PLAY />" Deploy"
                                    </button>
                                    <button
                                        class=css::primaryButton
                                        on:click=move |_| open_deployment(ctx, smart.clone(), DeployMode::Smart)
                                    >
                                        <Icon icon=ic::DEPLOY />" Smart deploy"
                                    </button>
                                </div>
                            </div>
                        }
                    }
                />
            </Show>
        </div>
    }
}
