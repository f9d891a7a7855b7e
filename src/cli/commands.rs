//! Command implementations

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::StdRandomAdapter;
use crate::app::{AppContainer, DefaultAppContainer};
use crate::cli::args::{ComposeArgs, ConfigOverrides, NormalizeArgs, PlanArgs};
use crate::config::{ComposerConfig, ConfigLoader};
use crate::domain::model::{AttemptOutcome, NormalizationReport};
use crate::utils::Utils;

/// Defaults, then the config file, then environment and flags
pub fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<ComposerConfig> {
    let mut config = ConfigLoader::load(path).context("Failed to load configuration")?;
    overrides
        .apply_to(&mut config)
        .context("Invalid configuration override")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Execute the compose command
pub async fn compose(config_path: Option<&Path>, seed: Option<u64>, args: ComposeArgs) -> Result<()> {
    let config = Arc::new(load_config(config_path, &args.overrides)?);
    let container = DefaultAppContainer::new(config);
    let mut rng = StdRandomAdapter::from_seed_option(seed);

    let response = container
        .compose_interactor()
        .compose(&mut rng)
        .await
        .context("Composition failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("Output:   {}", response.handoff.output_path.display());
        println!("Title:    {}", response.handoff.title);
        println!("Duration: {}", Utils::format_seconds(response.plan.duration.total));
        println!("Audio:    {:?}", response.audio_strategy);
        if let Some(scratch) = &response.scratch_dir {
            println!("Scratch:  {}", scratch.display());
        }
    }
    Ok(())
}

/// Execute the plan command
pub fn plan(config_path: Option<&Path>, seed: Option<u64>, args: PlanArgs) -> Result<()> {
    let config = Arc::new(load_config(config_path, &args.overrides)?);
    let container = DefaultAppContainer::new(config);
    let mut rng = StdRandomAdapter::from_seed_option(seed);

    let preview = container
        .compose_interactor()
        .preview(&mut rng, args.source_audio)
        .context("Planning failed")?;
    info!(strategy = ?preview.audio_strategy, "Plan resolved");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
        return Ok(());
    }

    let plan = &preview.plan;
    println!("Clip:      {}", preview.assets.source_clip.display());
    println!("Tagline:   {}", plan.wrapped.summary());
    println!("Duration:  {}", Utils::format_seconds(plan.duration.total));
    println!(
        "Headline:  {:.2}s - {:.2}s",
        plan.timing.headline.start, plan.timing.headline.end
    );
    if let Some(window) = &plan.timing.reappear {
        println!("Reappear:  {:.2}s - {:.2}s", window.start, window.end);
    }
    println!(
        "Layout:    {} {}x{} bar at {} ({}px)",
        plan.layout.fit_mode,
        plan.layout.inner_width,
        plan.layout.inner_height,
        plan.layout.bar_top,
        plan.layout.bar_height
    );
    println!("Audio:     {:?}", preview.audio_strategy);
    println!("Graph:     {}", preview.program);
    println!("Args:      {}", preview.args.join(" "));
    Ok(())
}

/// Execute the normalize command
pub async fn normalize(
    config_path: Option<&Path>,
    seed: Option<u64>,
    args: NormalizeArgs,
) -> Result<()> {
    let config = Arc::new(load_config(config_path, &args.overrides)?);
    let container = DefaultAppContainer::new(config);
    let mut rng = StdRandomAdapter::from_seed_option(seed);

    let (report, scratch) = container
        .compose_interactor()
        .normalize_only(&mut rng)
        .await
        .context("Normalization failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_attempts(&report);
        if let Some(scratch) = scratch {
            println!("Scratch: {}", scratch.display());
        }
    }
    Ok(())
}

fn print_attempts(report: &NormalizationReport) {
    for attempt in &report.attempts {
        let outcome = match &attempt.outcome {
            AttemptOutcome::Succeeded => "ok".to_string(),
            AttemptOutcome::Failed { reason } => format!("failed: {}", reason),
        };
        println!(
            "{} [{}] {} -> {}",
            attempt.at.format("%H:%M:%S%.3f"),
            attempt.strategy,
            attempt.candidate.display(),
            outcome
        );
    }
    match &report.selected {
        Some(asset) => println!("Selected: {}", asset.original.display()),
        None => println!("Selected: none. {}", report.summary()),
    }
}
