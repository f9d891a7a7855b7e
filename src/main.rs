//! Shortcast short video composer
//!
//! Picks a source clip, a tagline and background music, plans timing and layout, and
//! renders a vertical short through ffmpeg.
//!
//! # Usage
//!
//! ```bash
//! shortcast compose --videos-dir assets/videos/en --taglines data/en/taglines.txt
//! shortcast plan --seed 7 --json
//! shortcast normalize --bgm-dir assets/bgm/en
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use shortcast::cli::{commands, Cli, Commands};
use shortcast::utils::{init_logging, LogFormat};

/// Main entry point for the Shortcast CLI application
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let format = LogFormat::parse(&cli.log_format)?;
    init_logging(&cli.log_level, format)?;

    info!("Starting Shortcast");

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Compose(args) => {
            info!("Executing compose command");
            commands::compose(config_path, cli.seed, args).await?;
        }
        Commands::Plan(args) => {
            info!("Executing plan command");
            commands::plan(config_path, cli.seed, args)?;
        }
        Commands::Normalize(args) => {
            info!("Executing normalize command");
            commands::normalize(config_path, cli.seed, args).await?;
        }
    }

    info!("Shortcast completed successfully");
    Ok(())
}
