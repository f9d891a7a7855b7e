// Ports - Interface definitions (contracts)

use std::ffi::OsString;
use std::path::Path;

use async_trait::async_trait;

use crate::error::ShortcastResult;

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Whether the file carries at least one audio stream
    async fn has_audio_stream(&self, file_path: &Path) -> ShortcastResult<bool>;
}

/// Port for running the external encoding engine
///
/// The engine is a black box: a successful return means the process exited cleanly,
/// anything else is an `EngineFailed` error.
#[async_trait]
pub trait ExecutePort: Send + Sync {
    /// Run the engine with the given argument list and block until it exits
    async fn run(&self, args: &[OsString]) -> ShortcastResult<()>;
}

/// Source of uniform random draws
///
/// Everything random in a composition (asset picks, duration, candidate order) flows
/// through this one method so tests can substitute a fixed sequence.
pub trait RandomSource: Send {
    /// Draw a uniform float in `[0, 1)`
    fn next_f64(&mut self) -> f64;
}
