//! CLI module for Shortcast
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// Shortcast short video composer
///
/// Picks a clip, a tagline and a background track, plans timing and layout, and drives
/// ffmpeg to render a vertical short with a timed tagline overlay.
#[derive(Parser, Debug)]
#[command(name = "shortcast")]
#[command(about = "Shortcast - Compose short vertical videos with tagline overlays")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (overridden by RUST_LOG)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Log output format: pretty, compact or json
    #[arg(long, default_value = "pretty", global = true)]
    pub log_format: String,

    /// Configuration file (TOML or YAML)
    #[arg(long, global = true, env = "SHORTCAST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Seed for asset picks, duration and music order
    #[arg(long, global = true, env = "SHORTCAST_SEED")]
    pub seed: Option<u64>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compose and render a video
    Compose(args::ComposeArgs),
    /// Resolve the plan, filter graph and engine arguments without rendering
    Plan(args::PlanArgs),
    /// Run only the background music normalization chain
    Normalize(args::NormalizeArgs),
}
