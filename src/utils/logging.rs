//! Logging setup and output formatting

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error::{ShortcastError, ShortcastResult};

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Pretty,
    /// Compact text format
    Compact,
    /// JSON format for structured logging
    Json,
}

impl LogFormat {
    /// Parse log format from string
    pub fn parse(format_str: &str) -> ShortcastResult<Self> {
        match format_str.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(ShortcastError::config(format!(
                "unknown log format '{}' (expected pretty, compact or json)",
                other
            ))),
        }
    }
}

/// Filter directive: `RUST_LOG` when set, otherwise the requested level
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber; logs go to stderr so stdout stays machine-readable
pub fn init_logging(level: &str, format: LogFormat) -> ShortcastResult<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|e| ShortcastError::config(format!("failed to install logger: {}", e)))
}
