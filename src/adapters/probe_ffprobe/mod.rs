//! FFprobe adapter for media file probing
//!
//! This module provides FFprobe-based stream detection.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use crate::error::{ShortcastError, ShortcastResult};
use crate::ports::ProbePort;

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    binary: String,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter for the given binary name or path
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Interpret ffprobe's JSON answer to the first-audio-stream query
    fn parse_has_audio(stdout: &[u8]) -> ShortcastResult<bool> {
        let parsed: ProbeOutput = serde_json::from_slice(stdout)?;
        Ok(parsed
            .streams
            .iter()
            .any(|stream| stream.codec_type.as_deref() == Some("audio")))
    }
}

impl Default for FFprobeAdapter {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn has_audio_stream(&self, file_path: &Path) -> ShortcastResult<bool> {
        let output = Command::new(&self.binary)
            .args([
                "-v",
                "error",
                "-select_streams",
                "a:0",
                "-show_entries",
                "stream=codec_type",
                "-of",
                "json",
            ])
            .arg(file_path)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| ShortcastError::ProbeError {
                message: format!("failed to start {}: {}", self.binary, e),
            })?;

        if !output.status.success() {
            return Err(ShortcastError::ProbeError {
                message: format!(
                    "{} exited with {} for {}",
                    self.binary,
                    output.status,
                    file_path.display()
                ),
            });
        }

        Self::parse_has_audio(&output.stdout)
    }
}
