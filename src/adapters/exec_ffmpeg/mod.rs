//! FFmpeg execution adapter
//!
//! Runs the `ffmpeg` binary as a blocking subprocess step. Only the exit status matters;
//! stderr is kept for the error message when the engine fails.

use std::ffi::OsString;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{ShortcastError, ShortcastResult};
use crate::ports::ExecutePort;

/// Lines of stderr kept when the engine fails
const STDERR_TAIL_LINES: usize = 20;

/// FFmpeg-based execution adapter
pub struct FFmpegAdapter {
    binary: String,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter for the given binary name or path
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Keep the end of stderr, where ffmpeg reports the actual failure
    fn stderr_tail(stderr: &[u8]) -> String {
        let text = String::from_utf8_lossy(stderr);
        let lines: Vec<&str> = text.lines().collect();
        let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
        lines[start..].join("\n")
    }
}

impl Default for FFmpegAdapter {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl ExecutePort for FFmpegAdapter {
    async fn run(&self, args: &[OsString]) -> ShortcastResult<()> {
        debug!(
            binary = %self.binary,
            args = ?args,
            "Invoking encoding engine"
        );

        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                ShortcastError::engine_failed(
                    format!("failed to start {}: {}", self.binary, e),
                    None,
                    None,
                )
            })?;

        if output.status.success() {
            return Ok(());
        }

        Err(ShortcastError::engine_failed(
            format!("{} exited with {}", self.binary, output.status),
            output.status.code(),
            Some(Self::stderr_tail(&output.stderr)),
        ))
    }
}
