use std::sync::Arc;

use crate::adapters::{FFmpegAdapter, FFprobeAdapter};
use crate::app::compose_interactor::ComposeInteractor;
use crate::config::ComposerConfig;
use crate::ports::{ExecutePort, ProbePort};

pub trait AppContainer: Send + Sync {
    fn compose_interactor(&self) -> Arc<ComposeInteractor>;
}

pub struct DefaultAppContainer {
    compose_interactor: Arc<ComposeInteractor>,
}

impl DefaultAppContainer {
    /// Wire the subprocess adapters named by the encoder configuration
    pub fn new(config: Arc<ComposerConfig>) -> Self {
        let probe_port = Arc::new(FFprobeAdapter::new(config.encoder.ffprobe.clone()));
        let execute_port = Arc::new(FFmpegAdapter::new(config.encoder.ffmpeg.clone()));

        let compose_interactor = Arc::new(ComposeInteractor::new(
            Arc::clone(&probe_port) as Arc<dyn ProbePort>,
            Arc::clone(&execute_port) as Arc<dyn ExecutePort>,
            config,
        ));

        Self { compose_interactor }
    }
}

impl AppContainer for DefaultAppContainer {
    fn compose_interactor(&self) -> Arc<ComposeInteractor> {
        Arc::clone(&self.compose_interactor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_uses_configured_config() {
        let mut config = ComposerConfig::default();
        config.encoder.ffmpeg = "/opt/ffmpeg/bin/ffmpeg".to_string();
        let container = DefaultAppContainer::new(Arc::new(config));
        let interactor = container.compose_interactor();
        assert_eq!(interactor.config().encoder.ffmpeg, "/opt/ffmpeg/bin/ffmpeg");
    }
}
