use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use shortcast::adapters::StdRandomAdapter;
use shortcast::config::ComposerConfig;
use shortcast::domain::model::{DecodeStrategy, DisplayMode, FitMode, MixMode, TextAnchor};
use shortcast::engine::{AudioNormalizer, EngineInvocation};
use shortcast::graph::GraphCompiler;
use shortcast::planner::{LayoutPlanner, TimingPlanner};
use shortcast::ports::{ExecutePort, RandomSource};
use shortcast::{ShortcastError, ShortcastResult};

/// Decodes only the original whose copy contains `marker`, optionally only with a forced format
struct ScriptedEngine {
    marker: &'static [u8],
    needs_forced_format: bool,
    seen_inputs: Mutex<Vec<String>>,
}

impl ScriptedEngine {
    fn new(marker: &'static [u8], needs_forced_format: bool) -> Self {
        Self {
            marker,
            needs_forced_format,
            seen_inputs: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ExecutePort for ScriptedEngine {
    async fn run(&self, args: &[OsString]) -> ShortcastResult<()> {
        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        let forced = args.windows(2).any(|w| w[0] == "-f" && w[1] == "mp3");
        let input_at = args.iter().position(|a| a == "-i").unwrap();
        let input = &args[input_at + 1];
        let output = args.last().unwrap();
        self.seen_inputs.lock().unwrap().push(input.clone());

        let content = fs::read(input)?;
        let decodable = content == self.marker && (forced || !self.needs_forced_format);
        if decodable {
            fs::write(output, b"RIFF....WAVE")?;
            Ok(())
        } else {
            Err(ShortcastError::engine_failed(
                "Invalid data found when processing input",
                Some(1),
                None,
            ))
        }
    }
}

fn write_candidates(dir: &Path, files: &[(&str, &str)]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|(name, content)| {
            let path = dir.join(name);
            fs::write(&path, content).unwrap();
            path
        })
        .collect()
}

#[tokio::test]
async fn test_single_good_candidate_found_for_any_order() {
    let assets = TempDir::new().unwrap();
    let candidates = write_candidates(
        assets.path(),
        &[
            ("broken one.mp3", "garbage"),
            ("ﾐｭｰｼﾞｯｸ.m4a", "GOOD"),
            ("truncated.wav", "RIF"),
            ("silence.mp3", ""),
        ],
    );

    for seed in 0..16 {
        let scratch = TempDir::new().unwrap();
        let engine = Arc::new(ScriptedEngine::new(b"GOOD", false));
        let normalizer = AudioNormalizer::new(engine.clone(), scratch.path());
        let mut rng = StdRandomAdapter::seeded(seed);

        let report = normalizer.normalize(&candidates, &mut rng).await;

        let selected = report.selected.as_ref().expect("good candidate is selected");
        assert_eq!(selected.original, candidates[1]);
        let normalized = report.usable_path().unwrap();
        assert!(fs::metadata(normalized).unwrap().len() > 0);

        // Every copy the engine saw is ASCII-only and lives in scratch
        for input in engine.seen_inputs.lock().unwrap().iter() {
            assert!(input.is_ascii());
            assert!(Path::new(input).starts_with(scratch.path()));
        }

        // The chain stops at the first success
        assert!(report.attempts.last().unwrap().succeeded());
        assert_eq!(report.attempts.iter().filter(|a| a.succeeded()).count(), 1);
    }
}

#[tokio::test]
async fn test_mislabeled_container_needs_forced_format() {
    let assets = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let candidates = write_candidates(assets.path(), &[("really-an-mp3.wav", "GOOD")]);
    let engine = Arc::new(ScriptedEngine::new(b"GOOD", true));
    let normalizer = AudioNormalizer::new(engine, scratch.path());

    let report = normalizer
        .normalize(&candidates, &mut StdRandomAdapter::seeded(1))
        .await;

    let strategies: Vec<DecodeStrategy> = report.attempts.iter().map(|a| a.strategy).collect();
    assert_eq!(
        strategies,
        vec![DecodeStrategy::Probe, DecodeStrategy::ForcedFormat]
    );
    assert!(report.selected.is_some());
}

#[tokio::test]
async fn test_exhausted_chain_reports_every_attempt() {
    let assets = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let candidates = write_candidates(
        assets.path(),
        &[("a.mp3", "x"), ("b.mp3", "y"), ("c.wav", "z")],
    );
    let normalizer = AudioNormalizer::new(
        Arc::new(ScriptedEngine::new(b"GOOD", false)),
        scratch.path(),
    );

    let report = normalizer
        .normalize(&candidates, &mut StdRandomAdapter::seeded(9))
        .await;

    assert!(report.selected.is_none());
    assert_eq!(report.assets.len(), 3);
    assert_eq!(report.attempts.len(), 6);
    assert_eq!(report.failed_count(), 3);
    let timestamps: Vec<_> = report.attempts.iter().map(|a| a.at).collect();
    assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_compiled_graphs_validate_across_configurations() {
    let mut rng = StdRandomAdapter::seeded(2112);
    let base = ComposerConfig::default();

    for _ in 0..200 {
        let mut config = base.clone();
        config.layout.fit_mode = if rng.next_f64() < 0.5 {
            FitMode::Cover
        } else {
            FitMode::Contain
        };
        config.layout.inset = 0.7 + rng.next_f64() * 0.4;
        config.layout.anchor = match (rng.next_f64() * 3.0) as u32 {
            0 => TextAnchor::Top,
            1 => TextAnchor::Center,
            _ => TextAnchor::Bottom,
        };
        config.audio.mix_mode = if rng.next_f64() < 0.5 {
            MixMode::Bgm
        } else {
            MixMode::Mix
        };
        let mode = if rng.next_f64() < 0.5 {
            DisplayMode::AlwaysOn
        } else {
            DisplayMode::HeadlineReappear
        };
        let total = 5.0 + rng.next_f64() * 55.0;
        let has_source = rng.next_f64() < 0.5;
        let has_bgm = rng.next_f64() < 0.5;

        let timing = TimingPlanner::new(mode, 3.0, 11.0, 0.8).plan(total);
        let layout = LayoutPlanner::from_config(&config.layout, &config.text, &config.bar).plan();
        assert!(layout.bar_top + layout.bar_height <= layout.canvas.height);

        let graph = GraphCompiler::new(config.text.clone(), config.bar.clone(), config.audio.clone())
            .compile(
                &timing,
                &layout,
                Path::new("/scratch/tagline.txt"),
                has_source,
                has_bgm,
            );
        let invocation = EngineInvocation::new(
            "/clips/clip.mp4",
            has_bgm.then(|| PathBuf::from("/scratch/bgm-00-norm.wav")),
            total,
            "/scratch/filters.txt",
            &graph,
            config.encoder.clone(),
            "/out/final.mp4",
        );

        graph.validate(invocation.input_count()).unwrap();
        let args = invocation.args();
        assert_eq!(
            args.iter().any(|a| a == "-an"),
            graph.audio_output().is_none()
        );
    }
}
