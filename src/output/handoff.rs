//! Upload handoff: title, description and final path for the publishing step

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::HandoffConfig;
use crate::error::{ShortcastError, ShortcastResult};
use crate::utils::{PathUtils, Utils};

/// Maximum title length, in characters
pub const TITLE_MAX_CHARS: usize = 95;
/// Between the title prefix and the tagline
pub const TITLE_SEPARATOR: &str = " — ";
/// Heredoc delimiter for the multi-line description
pub const ENV_DELIMITER: &str = "EOF";

/// Values handed to the upload step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Handoff {
    pub title: String,
    pub description: String,
    pub output_path: PathBuf,
}

impl Handoff {
    /// Build the handoff for a finished composition
    ///
    /// Description lines may contain `{tagline}` and `{duration}` placeholders.
    pub fn new(
        config: &HandoffConfig,
        tagline: &str,
        duration: f64,
        output: &Path,
    ) -> ShortcastResult<Self> {
        let title = Utils::truncate_chars(
            &format!("{}{}{}", config.title_prefix, TITLE_SEPARATOR, tagline),
            TITLE_MAX_CHARS,
        );
        let duration_text = Utils::format_seconds(duration);
        let description = config
            .description
            .iter()
            .map(|line| {
                line.replace("{tagline}", tagline)
                    .replace("{duration}", &duration_text)
            })
            .collect::<Vec<_>>()
            .join("\n");

        Ok(Self {
            title,
            description,
            output_path: PathUtils::absolute(output)?,
        })
    }

    /// `KEY=value` block with the description as a heredoc
    pub fn env_block(&self) -> String {
        format!(
            "VIDEO_TITLE={}\nVIDEO_DESC<<{delim}\n{}\n{delim}\nFINAL_MP4={}\n",
            self.title,
            self.description,
            self.output_path.display(),
            delim = ENV_DELIMITER
        )
    }

    /// Append the env block to a file, creating it if needed
    pub fn append_env_file(&self, path: &Path) -> ShortcastResult<()> {
        if self
            .description
            .lines()
            .any(|line| line == ENV_DELIMITER)
        {
            return Err(ShortcastError::HandoffError {
                message: format!("description contains the '{}' delimiter line", ENV_DELIMITER),
            });
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(self.env_block().as_bytes())?;
        info!(path = %path.display(), "Handoff appended to env file");
        Ok(())
    }

    /// Write the handoff as pretty JSON
    pub fn write_json(&self, path: &Path) -> ShortcastResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!(path = %path.display(), "Handoff written as JSON");
        Ok(())
    }

    /// Run every export the configuration asks for
    pub fn export(&self, config: &HandoffConfig) -> ShortcastResult<()> {
        if let Some(env_file) = &config.env_file {
            self.append_env_file(env_file)?;
        }
        if let Some(json_file) = &config.json_file {
            self.write_json(json_file)?;
        }
        Ok(())
    }
}
