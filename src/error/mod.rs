//! Error handling module for Shortcast

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Category of a required input that could not be found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetCategory {
    /// Source video clip
    Clip,
    /// Tagline text
    Tagline,
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetCategory::Clip => write!(f, "source clip"),
            AssetCategory::Tagline => write!(f, "tagline"),
        }
    }
}

/// Main error type for Shortcast operations
#[derive(Error, Debug)]
pub enum ShortcastError {
    /// A required input asset is missing; composition cannot start
    #[error("No {category} found in {}", location.display())]
    MissingAsset {
        category: AssetCategory,
        location: PathBuf,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {message}")]
    ConfigError { message: String },

    /// Media probe error
    #[error("Failed to probe media file: {message}")]
    ProbeError { message: String },

    /// The external encoding engine could not be started or exited unsuccessfully
    #[error("Encoding engine failed: {message}")]
    EngineFailed {
        message: String,
        exit_code: Option<i32>,
        stderr: Option<String>,
    },

    /// Filter graph references a label nothing produced
    #[error("Inconsistent filter graph: {message}")]
    GraphError { message: String },

    /// Handoff export error
    #[error("Failed to write handoff: {message}")]
    HandoffError { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML config parse error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// YAML config parse error
    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl ShortcastError {
    /// Create a missing-asset error
    pub fn missing(category: AssetCategory, location: impl Into<PathBuf>) -> Self {
        Self::MissingAsset {
            category,
            location: location.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an engine failure error
    pub fn engine_failed(
        message: impl Into<String>,
        exit_code: Option<i32>,
        stderr: Option<String>,
    ) -> Self {
        Self::EngineFailed {
            message: message.into(),
            exit_code,
            stderr,
        }
    }
}

/// Result type alias for Shortcast operations
pub type ShortcastResult<T> = std::result::Result<T, ShortcastError>;
