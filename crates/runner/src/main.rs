//! Command-line driver for one scenario generation run.
//!
//! Reads a script file, walks the wizard through parse, estimate, and
//! generate against a live studio deployment, then polls the generation
//! status until a terminal state or Ctrl-C.

mod config;

use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelkit_client::StudioApi;
use reelkit_core::model::ModelInfo;
use reelkit_core::scenario::OutputType;
use reelkit_wizard::{PollOutcome, ScenarioWizard};

use crate::config::RunnerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelkit_runner=info,reelkit_wizard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RunnerConfig::from_env();
    let output_type = OutputType::from_str_api(&config.output_type)?;

    let script = tokio::fs::read_to_string(&config.script_path)
        .await
        .with_context(|| format!("failed to read script file {}", config.script_path))?;

    let mut api = StudioApi::new(&config.base_url);
    if let Some(cookie) = &config.session_cookie {
        api = api.with_session(cookie.clone());
    }

    // The runner drives a single pre-configured model; a full frontend
    // would fetch the provider catalog instead.
    let catalog = vec![ModelInfo {
        id: config.model_id.clone(),
        label: config.model_id.clone(),
        credits_cost: config.model_credits_cost,
        output_types: vec![OutputType::Video, OutputType::Image],
        enabled: true,
        coming_soon: false,
    }];

    let mut wizard = ScenarioWizard::new(Arc::new(api), catalog)
        .with_poll_interval(config.poll_interval)
        .on_credits_update(Box::new(|scenario| {
            tracing::info!(
                scenario_id = scenario.id,
                status = scenario.status.as_str(),
                "Generation finished; refresh the credit balance",
            );
        }));

    wizard.set_script(script)?;
    wizard.set_output_type(output_type)?;
    wizard.select_model(&config.model_id)?;
    wizard.set_current_credits(config.current_credits);

    wizard.parse().await.context("script parse failed")?;
    tracing::info!(
        scene_count = wizard.scenes().len(),
        title = wizard.title().unwrap_or("(untitled)"),
        estimated_credits = wizard.total_credits(),
        "Script parsed",
    );
    for scene in wizard.scenes() {
        tracing::info!(
            order = scene.order,
            duration_secs = scene.duration_secs,
            prompt = %scene.prompt,
            "Scene",
        );
    }

    wizard
        .generate_readiness()
        .context("generation blocked")?;
    let scenario_id = wizard.generate().await.context("generation failed to start")?;
    tracing::info!(scenario_id, "Generation started; polling until terminal (Ctrl-C to stop)");

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    let outcome = wizard.poll_until_terminal(cancel).await?;
    match outcome {
        PollOutcome::Terminal(status) => {
            tracing::info!(status = status.as_str(), "Run finished");
        }
        PollOutcome::Cancelled => {
            tracing::warn!("Polling cancelled; the scenario may still be generating server-side");
        }
        PollOutcome::TimedOut => {
            tracing::warn!("Polling deadline elapsed before a terminal status");
        }
    }

    if let Some(scenario) = wizard.scenario() {
        tracing::info!(
            completed = scenario.completed_scenes,
            total = scenario.total_scenes,
            progress = scenario.progress,
            "Final progress",
        );
        for scene in &scenario.scenes {
            match (&scene.result_url, &scene.error_message) {
                (Some(url), _) => tracing::info!(order = scene.order, url = %url, "Scene result"),
                (None, Some(err)) => {
                    tracing::warn!(order = scene.order, error = %err, "Scene failed")
                }
                (None, None) => {
                    tracing::info!(
                        order = scene.order,
                        status = scene.status.as_str(),
                        "Scene pending",
                    )
                }
            }
        }
    }

    Ok(())
}
