//! Configuration file loading
//!
//! Precedence, lowest first: defaults, config file, environment, CLI. This module covers
//! the first two; the CLI layer applies the rest on top.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::ComposerConfig;
use crate::error::{ShortcastError, ShortcastResult};

/// Files looked for when no config path is given
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "shortcast.toml",
    "shortcast.yaml",
    "shortcast.yml",
    "config/shortcast.toml",
];

/// Supported config file syntaxes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> ShortcastResult<Self> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "toml" => Ok(ConfigFormat::Toml),
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            _ => Err(ShortcastError::config(format!(
                "unsupported config file type: {} (expected .toml, .yaml or .yml)",
                path.display()
            ))),
        }
    }
}

/// Loads [`ComposerConfig`] from files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the explicit file if given, else the first default path that exists, else defaults
    pub fn load(explicit: Option<&Path>) -> ShortcastResult<ComposerConfig> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ShortcastError::config(format!(
                        "config file does not exist: {}",
                        path.display()
                    )));
                }
                Some(path.to_path_buf())
            }
            None => Self::discover(),
        };

        match path {
            Some(path) => {
                info!("Loading configuration from: {}", path.display());
                Self::load_file(&path)
            }
            None => {
                debug!("No config file found, using defaults");
                Ok(ComposerConfig::default())
            }
        }
    }

    /// Parse a config file, detecting the syntax from its extension
    pub fn load_file(path: &Path) -> ShortcastResult<ComposerConfig> {
        let format = ConfigFormat::from_path(path)?;
        let content = fs::read_to_string(path)?;
        Self::parse(&content, format)
    }

    /// Parse config text; missing keys take their defaults
    pub fn parse(content: &str, format: ConfigFormat) -> ShortcastResult<ComposerConfig> {
        let config: ComposerConfig = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Yaml => {
                if content.trim().is_empty() {
                    ComposerConfig::default()
                } else {
                    serde_yaml::from_str(content)?
                }
            }
        };
        Ok(config)
    }

    fn discover() -> Option<PathBuf> {
        DEFAULT_CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DisplayMode, FitMode, MixMode, TextAnchor};

    #[test]
    fn test_parse_partial_toml_keeps_defaults() {
        let config = ConfigLoader::parse(
            r#"
[audio]
mix_mode = "mix"
bgm_volume = 0.4

[layout]
fit_mode = "contain"
inset = 0.9
anchor = "bottom"
"#,
            ConfigFormat::Toml,
        )
        .unwrap();

        assert_eq!(config.audio.mix_mode, MixMode::Mix);
        assert_eq!(config.audio.bgm_volume, 0.4);
        assert_eq!(config.audio.video_volume, 1.0);
        assert_eq!(config.layout.fit_mode, FitMode::Contain);
        assert_eq!(config.layout.anchor, TextAnchor::Bottom);
        assert_eq!(config.text.font_size, 72);
    }

    #[test]
    fn test_parse_yaml() {
        let config = ConfigLoader::parse(
            "display:\n  mode: always-on\n  tail_off_seconds: 1.5\nduration:\n  seconds: 15\n",
            ConfigFormat::Yaml,
        )
        .unwrap();

        assert_eq!(config.display.mode, DisplayMode::AlwaysOn);
        assert_eq!(config.display.tail_off_seconds, 1.5);
        assert_eq!(config.duration.seconds, Some(15.0));
    }

    #[test]
    fn test_unknown_enum_value_is_error() {
        let result = ConfigLoader::parse("[layout]\nfit_mode = \"stretch\"\n", ConfigFormat::Toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("a/b.TOML")).unwrap(),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("c.yml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert!(ConfigFormat::from_path(Path::new("c.json")).is_err());
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let result = ConfigLoader::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shortcast.toml");
        fs::write(&path, "[text]\nmax_lines = 3\n").unwrap();

        let config = ConfigLoader::load(Some(&path)).unwrap();
        assert_eq!(config.text.max_lines, 3);
    }
}
