//! Background audio normalization chain
//!
//! Candidates arrive untrusted: odd file names, mislabeled containers, truncated
//! frames. Each one is copied under an ASCII-only name and decoded to stereo PCM WAV,
//! first with a tolerant probe and then with a forced input format. The first candidate
//! that yields a non-empty WAV wins; every attempt lands in the report.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::domain::model::{
    AttemptOutcome, AudioAsset, AudioStatus, DecodeStrategy, NormalizationAttempt,
    NormalizationReport,
};
use crate::domain::rules::shuffle;
use crate::engine::invocation::decode_args;
use crate::ports::{ExecutePort, RandomSource};
use crate::utils::{PathUtils, Utils};

/// Strategies in the order they are tried
pub const STRATEGIES: [DecodeStrategy; 2] = [DecodeStrategy::Probe, DecodeStrategy::ForcedFormat];

/// Runs the fallback chain against a scratch directory owned by the current run
pub struct AudioNormalizer {
    execute: Arc<dyn ExecutePort>,
    scratch: PathBuf,
}

impl AudioNormalizer {
    /// Create a normalizer writing copies and WAV files into `scratch`
    pub fn new(execute: Arc<dyn ExecutePort>, scratch: impl Into<PathBuf>) -> Self {
        Self {
            execute,
            scratch: scratch.into(),
        }
    }

    /// Shuffle the candidates and return the first one that normalizes
    pub async fn normalize(
        &self,
        candidates: &[PathBuf],
        rng: &mut dyn RandomSource,
    ) -> NormalizationReport {
        let mut order: Vec<PathBuf> = candidates.to_vec();
        shuffle(rng, &mut order);

        let mut report = NormalizationReport::default();
        for (index, original) in order.iter().enumerate() {
            let asset = self.try_candidate(index, original, &mut report).await;
            let usable = asset.status == AudioStatus::Normalized;
            report.assets.push(asset.clone());

            if usable {
                info!(
                    candidate = %original.display(),
                    normalized = ?asset.normalized,
                    "Background track normalized"
                );
                report.selected = Some(asset);
                return report;
            }
            warn!(
                candidate = %original.display(),
                "Background track could not be decoded, trying next"
            );
        }

        warn!(
            candidates = order.len(),
            attempts = report.attempts.len(),
            "{}",
            report.summary()
        );
        report
    }

    async fn try_candidate(
        &self,
        index: usize,
        original: &Path,
        report: &mut NormalizationReport,
    ) -> AudioAsset {
        let sanitized = self
            .scratch
            .join(PathUtils::sanitized_file_name(index, original));
        let mut asset = AudioAsset::new(original, &sanitized);

        if let Err(e) = fs::copy(original, &sanitized).await {
            report.attempts.push(Self::attempt(
                original,
                DecodeStrategy::Probe,
                AttemptOutcome::Failed {
                    reason: format!("copy to scratch failed: {}", e),
                },
            ));
            asset.status = AudioStatus::Failed;
            return asset;
        }

        let output = self.scratch.join(PathUtils::normalized_file_name(index));
        for strategy in STRATEGIES {
            let outcome = self.decode(strategy, &sanitized, &output).await;
            let succeeded = matches!(outcome, AttemptOutcome::Succeeded);
            debug!(
                candidate = %original.display(),
                strategy = %strategy,
                outcome = ?outcome,
                "Decode attempt finished"
            );
            report
                .attempts
                .push(Self::attempt(original, strategy, outcome));

            if succeeded {
                asset.normalized = Some(output);
                asset.status = AudioStatus::Normalized;
                return asset;
            }
        }

        asset.status = AudioStatus::Failed;
        asset
    }

    async fn decode(&self, strategy: DecodeStrategy, input: &Path, output: &Path) -> AttemptOutcome {
        let args = decode_args(strategy, input, output);
        if let Err(e) = self.execute.run(&args).await {
            return AttemptOutcome::Failed {
                reason: e.to_string(),
            };
        }

        match fs::metadata(output).await {
            Ok(meta) if meta.len() > 0 => {
                debug!(size = %Utils::format_file_size(meta.len()), "Normalized WAV written");
                AttemptOutcome::Succeeded
            }
            Ok(_) => AttemptOutcome::Failed {
                reason: "engine produced an empty file".to_string(),
            },
            Err(e) => AttemptOutcome::Failed {
                reason: format!("engine produced no output: {}", e),
            },
        }
    }

    fn attempt(
        candidate: &Path,
        strategy: DecodeStrategy,
        outcome: AttemptOutcome,
    ) -> NormalizationAttempt {
        NormalizationAttempt {
            candidate: candidate.to_path_buf(),
            strategy,
            outcome,
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ShortcastError, ShortcastResult};
    use async_trait::async_trait;
    use std::ffi::OsString;
    use tempfile::TempDir;

    /// Writes the output WAV only for inputs whose name contains `good`
    struct NameGatedEngine {
        forced_only: bool,
    }

    #[async_trait]
    impl ExecutePort for NameGatedEngine {
        async fn run(&self, args: &[OsString]) -> ShortcastResult<()> {
            let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
            let forced = args.iter().any(|a| a == "-f");
            let input = args
                .iter()
                .position(|a| a == "-i")
                .map(|i| args[i + 1].clone())
                .unwrap_or_default();
            let output = args.last().cloned().unwrap_or_default();

            if input.contains("good") && (forced || !self.forced_only) {
                std::fs::write(output, b"RIFF").map_err(ShortcastError::from)?;
                Ok(())
            } else {
                Err(ShortcastError::engine_failed("invalid data", Some(1), None))
            }
        }
    }

    struct Fixed(f64);

    impl RandomSource for Fixed {
        fn next_f64(&mut self) -> f64 {
            self.0
        }
    }

    fn candidates(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                std::fs::write(&path, b"ID3").unwrap();
                path
            })
            .collect()
    }

    #[tokio::test]
    async fn test_no_candidates_yields_empty_report() {
        let scratch = TempDir::new().unwrap();
        let normalizer =
            AudioNormalizer::new(Arc::new(NameGatedEngine { forced_only: false }), scratch.path());
        let report = normalizer.normalize(&[], &mut Fixed(0.0)).await;
        assert!(report.selected.is_none());
        assert!(report.attempts.is_empty());
        assert!(report.summary().contains("No background candidates found"));
    }

    #[tokio::test]
    async fn test_first_strategy_success_stops_chain() {
        let assets = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let files = candidates(assets.path(), &["good song.mp3"]);
        let normalizer =
            AudioNormalizer::new(Arc::new(NameGatedEngine { forced_only: false }), scratch.path());

        let report = normalizer.normalize(&files, &mut Fixed(0.0)).await;
        assert_eq!(report.attempts.len(), 1);
        assert_eq!(report.attempts[0].strategy, DecodeStrategy::Probe);
        let selected = report.selected.clone().unwrap();
        assert_eq!(selected.original, files[0]);
        assert_eq!(
            selected.sanitized,
            scratch.path().join("bgm-00-good_song.mp3")
        );
        assert_eq!(
            report.usable_path(),
            Some(scratch.path().join("bgm-00-norm.wav").as_path())
        );
    }

    #[tokio::test]
    async fn test_forced_format_fallback() {
        let assets = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let files = candidates(assets.path(), &["good.m4a"]);
        let normalizer =
            AudioNormalizer::new(Arc::new(NameGatedEngine { forced_only: true }), scratch.path());

        let report = normalizer.normalize(&files, &mut Fixed(0.0)).await;
        let strategies: Vec<DecodeStrategy> =
            report.attempts.iter().map(|a| a.strategy).collect();
        assert_eq!(strategies, STRATEGIES.to_vec());
        assert!(!report.attempts[0].succeeded());
        assert!(report.attempts[1].succeeded());
        assert!(report.usable_path().is_some());
    }

    #[tokio::test]
    async fn test_copy_failure_is_recorded() {
        let scratch = TempDir::new().unwrap();
        let normalizer =
            AudioNormalizer::new(Arc::new(NameGatedEngine { forced_only: false }), scratch.path());
        let missing = vec![PathBuf::from("/no/such/good.mp3")];

        let report = normalizer.normalize(&missing, &mut Fixed(0.0)).await;
        assert!(report.selected.is_none());
        assert_eq!(report.attempts.len(), 1);
        assert!(matches!(
            &report.attempts[0].outcome,
            AttemptOutcome::Failed { reason } if reason.contains("copy")
        ));
        assert_eq!(report.failed_count(), 1);
    }

    #[tokio::test]
    async fn test_all_candidates_fail() {
        let assets = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let files = candidates(assets.path(), &["bad1.mp3", "bad2.wav", "bad3.m4a"]);
        let normalizer =
            AudioNormalizer::new(Arc::new(NameGatedEngine { forced_only: false }), scratch.path());

        let report = normalizer.normalize(&files, &mut Fixed(0.3)).await;
        assert!(report.selected.is_none());
        assert!(report.usable_path().is_none());
        assert_eq!(report.attempts.len(), 6);
        assert_eq!(report.failed_count(), 3);
        assert!(report.summary().contains("continuing without music"));
    }
}
