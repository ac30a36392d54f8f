//! Shared workflow views: step list, progress bar, failure detail, log list.

use leptos::prelude::*;
use leptos_icons::Icon;

use super::css;
use crate::components::icons as ic;
use crate::models::{DeploymentError, DeploymentLog, DeploymentStep, LogLevel, Severity, StepStatus};
use crate::utils::dom::copy_text;
use crate::utils::format::format_time;

fn status_class(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Pending => css::stepPending,
        StepStatus::Loading => css::stepLoading,
        StepStatus::Success => css::stepSuccess,
        StepStatus::Error => css::stepError,
    }
}

fn status_marker(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Pending => "○",
        StepStatus::Loading => "◌",
        StepStatus::Success => "✓",
        StepStatus::Error => "✗",
    }
}

#[component]
pub fn StepList(
    #[prop(into)] steps: Signal<Vec<DeploymentStep>>,
    #[prop(into)] progress: Signal<u32>,
) -> impl IntoView {
    view! {
        <div class=css::progressTrack>
            <div class=css::progressFill style=move || format!("width: {}%", progress.get())></div>
        </div>
        <ol class=css::steps>
            <For
                each=move || steps.get()
                key=|step| (step.id, step.status, step.attempts, step.detail.clone())
                children=|step: DeploymentStep| {
                    let retry = (step.attempts > 1).then(|| format!(" (attempt {})", step.attempts));
                    view! {
                        <li class=format!("{} {}", css::step, status_class(step.status))>
                            <span class=css::stepMarker>{status_marker(step.status)}</span>
                            <div class=css::stepBody>
                                <div class=css::stepLabel>{step.label}{retry}</div>
                                {step.detail.map(|d| view! { <div class=css::stepDetail>{d}</div> })}
                            </div>
                        </li>
                    }
                }
            />
        </ol>
    }
}

fn severity_class(severity: Severity) -> &'static str {
    match severity {
        Severity::Low => css::severityLow,
        Severity::Medium => css::severityMedium,
        Severity::High | Severity::Critical => css::severityHigh,
    }
}

/// Failure summary with an expandable, copyable technical section.
#[component]
pub fn ErrorDetail(error: DeploymentError, technical: Option<String>) -> impl IntoView {
    let technical = technical.map(|details| {
        let copy = {
            let details = details.clone();
            move |_| {
                copy_text(&details);
            }
        };
        view! {
            <details class=css::technical>
                <summary>"Technical details"</summary>
                <pre class=css::technicalBody>{details}</pre>
                <button class=css::secondaryButton on:click=copy>
                    <Icon icon=ic::COPY />" Copy"
                </button>
            </details>
        }
    });

    view! {
        <div class=css::errorBox>
            <div class=css::errorCode>
                <span class=format!("{} {}", css::badge, severity_class(error.severity))>
                    {error.severity.label()}
                </span>
                " "{error.code}" in "{error.step_id}
            </div>
            <div>{error.message}</div>
            {(!error.suggestion.is_empty())
                .then(|| view! { <div class=css::suggestion>{error.suggestion}</div> })}
            {technical}
        </div>
    }
}

fn level_class(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Info => css::logInfo,
        LogLevel::Success => css::logSuccess,
        LogLevel::Warn => css::logWarn,
        LogLevel::Error => css::logError,
    }
}

#[component]
pub fn LogList(#[prop(into)] logs: Signal<Vec<DeploymentLog>>) -> impl IntoView {
    view! {
        <div class=css::logs>
            {move || {
                logs.get()
                    .into_iter()
                    .map(|log| {
                        view! {
                            <div class=level_class(log.level)>
                                <span class=css::logTime>{format_time(log.timestamp)}</span>
                                {log.message}
                            </div>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}
