// Compose interactor - Orchestrates the composition use case

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tempfile::TempDir;
use tracing::{info, warn};

use crate::config::ComposerConfig;
use crate::domain::model::*;
use crate::domain::rules::AudioStrategy;
use crate::engine::{AudioNormalizer, EngineInvocation};
use crate::error::ShortcastResult;
use crate::graph::{FilterGraph, GraphCompiler};
use crate::output::{Handoff, ScratchWriter};
use crate::planner::CompositionPlanner;
use crate::ports::*;
use crate::utils::{AssetCatalog, PathUtils, Utils};

/// Prefix of per-run scratch directories
pub const SCRATCH_PREFIX: &str = "shortcast-";

/// Inputs picked for one run
#[derive(Debug, Clone, Serialize)]
pub struct SelectedAssets {
    pub source_clip: PathBuf,
    pub tagline: String,
    pub bgm_candidates: Vec<PathBuf>,
}

/// Everything a dry run resolves without touching the engine
#[derive(Debug, Clone, Serialize)]
pub struct PlanPreview {
    pub assets: SelectedAssets,
    pub plan: CompositionPlan,
    pub audio_strategy: AudioStrategy,
    pub program: String,
    pub args: Vec<String>,
}

/// Result of a finished composition
#[derive(Debug, Clone, Serialize)]
pub struct ComposeResponse {
    pub assets: SelectedAssets,
    pub plan: CompositionPlan,
    pub has_source_audio: bool,
    pub normalization: NormalizationReport,
    pub audio_strategy: AudioStrategy,
    pub program: String,
    pub handoff: Handoff,
    /// Present when the scratch directory was kept
    pub scratch_dir: Option<PathBuf>,
}

struct Rendered {
    normalization: NormalizationReport,
    graph: FilterGraph,
    handoff: Handoff,
}

/// Interactor for the composition use case
pub struct ComposeInteractor {
    probe_port: Arc<dyn ProbePort>,
    execute_port: Arc<dyn ExecutePort>,
    config: Arc<ComposerConfig>,
}

impl ComposeInteractor {
    /// Create new compose interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        execute_port: Arc<dyn ExecutePort>,
        config: Arc<ComposerConfig>,
    ) -> Self {
        Self {
            probe_port,
            execute_port,
            config,
        }
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Pick the clip and tagline and list background candidates
    ///
    /// Missing clips or taglines are fatal; an empty music directory is not.
    pub fn select_assets(&self, rng: &mut dyn RandomSource) -> ShortcastResult<SelectedAssets> {
        let assets = &self.config.assets;
        let source_clip =
            AssetCatalog::pick_clip(&assets.videos_dir, &assets.video_extensions, rng)?;
        let tagline = AssetCatalog::pick_tagline(&assets.taglines_file, rng)?;
        let bgm_candidates = AssetCatalog::list_files(&assets.bgm_dir, &assets.audio_extensions)?;

        info!(
            clip = %source_clip.display(),
            tagline = %tagline,
            bgm_candidates = bgm_candidates.len(),
            "Assets selected"
        );

        Ok(SelectedAssets {
            source_clip,
            tagline,
            bgm_candidates,
        })
    }

    /// Freeze the configuration and selected assets into a request
    pub fn build_request(&self, assets: &SelectedAssets) -> CompositionRequest {
        let config = &self.config;
        CompositionRequest {
            source_clip: assets.source_clip.clone(),
            tagline: assets.tagline.clone(),
            candidate_audio: assets.bgm_candidates.clone(),
            target_duration: config.duration.seconds,
            duration_bounds: (config.duration.min, config.duration.max),
            layout: config.layout.clone(),
            text: config.text.clone(),
            bar: config.bar.clone(),
            display: config.display.clone(),
            audio: config.audio.clone(),
        }
    }

    fn compiler(&self, request: &CompositionRequest) -> GraphCompiler {
        GraphCompiler::new(request.text.clone(), request.bar.clone(), request.audio.clone())
    }

    /// Resolve the plan, graph and engine arguments without running anything
    ///
    /// The first background candidate is assumed to normalize.
    pub fn preview(
        &self,
        rng: &mut dyn RandomSource,
        has_source_audio: bool,
    ) -> ShortcastResult<PlanPreview> {
        let assets = self.select_assets(rng)?;
        let request = self.build_request(&assets);
        let plan = CompositionPlanner::plan(&request, rng);

        let scratch = ScratchWriter::new(&self.config.assets.scratch_root);
        let bgm = (!assets.bgm_candidates.is_empty())
            .then(|| scratch.dir().join(PathUtils::normalized_file_name(0)));
        let graph = self.compiler(&request).compile(
            &plan.timing,
            &plan.layout,
            &scratch.tagline_path(),
            has_source_audio,
            bgm.is_some(),
        );
        let invocation = self.invocation(&request, &plan, &graph, bgm, scratch.program_path());
        graph.validate(invocation.input_count())?;

        Ok(PlanPreview {
            assets,
            audio_strategy: graph.audio_strategy,
            program: graph.program(),
            args: invocation
                .args()
                .iter()
                .map(|arg| arg.to_string_lossy().into_owned())
                .collect(),
            plan,
        })
    }

    /// Run only the background normalization chain
    pub async fn normalize_only(
        &self,
        rng: &mut dyn RandomSource,
    ) -> ShortcastResult<(NormalizationReport, Option<PathBuf>)> {
        let assets = &self.config.assets;
        let candidates = AssetCatalog::list_files(&assets.bgm_dir, &assets.audio_extensions)?;
        let scratch = self.create_scratch()?;

        let normalizer = AudioNormalizer::new(Arc::clone(&self.execute_port), scratch.path());
        let report = normalizer.normalize(&candidates, rng).await;

        Ok((report, self.release_scratch(scratch)))
    }

    /// Run the full pipeline and hand the result off
    pub async fn compose(&self, rng: &mut dyn RandomSource) -> ShortcastResult<ComposeResponse> {
        let assets = self.select_assets(rng)?;
        let request = self.build_request(&assets);

        let plan = CompositionPlanner::plan(&request, rng);
        info!(
            duration = %Utils::format_seconds(plan.duration.total),
            lines = %plan.wrapped.summary(),
            forced = plan.wrapped.forced,
            fit = %plan.layout.fit_mode,
            "Composition planned"
        );

        let has_source_audio = self.probe_source_audio(&request.source_clip).await;

        let scratch = self.create_scratch()?;
        let rendered = self
            .render(&request, &plan, has_source_audio, scratch.path(), rng)
            .await;
        // Release before propagating; a kept scratch directory outlives a failed run
        let scratch_dir = self.release_scratch(scratch);
        let Rendered {
            normalization,
            graph,
            handoff,
        } = rendered?;

        info!(
            title = %handoff.title,
            output = %handoff.output_path.display(),
            duration = %Utils::format_seconds(plan.duration.total),
            bgm = ?normalization.selected.as_ref().map(|asset| &asset.original),
            "Composition finished"
        );

        Ok(ComposeResponse {
            assets,
            plan,
            has_source_audio,
            normalization,
            audio_strategy: graph.audio_strategy,
            program: graph.program(),
            handoff,
            scratch_dir,
        })
    }

    /// Every step that reads or writes the scratch directory, ending with the engine run
    async fn render(
        &self,
        request: &CompositionRequest,
        plan: &CompositionPlan,
        has_source_audio: bool,
        scratch: &Path,
        rng: &mut dyn RandomSource,
    ) -> ShortcastResult<Rendered> {
        let writer = ScratchWriter::new(scratch);

        let normalizer = AudioNormalizer::new(Arc::clone(&self.execute_port), scratch);
        let normalization = normalizer.normalize(&request.candidate_audio, rng).await;
        let bgm = normalization.usable_path().map(Path::to_path_buf);

        let textfile = writer.write_tagline(&plan.wrapped)?;
        let graph = self.compiler(request).compile(
            &plan.timing,
            &plan.layout,
            &textfile,
            has_source_audio,
            bgm.is_some(),
        );
        let invocation = self.invocation(request, plan, &graph, bgm, writer.program_path());
        graph.validate(invocation.input_count())?;
        writer.write_program(&graph)?;

        ScratchWriter::ensure_output_directory(&self.config.assets.output)?;
        info!(
            strategy = ?graph.audio_strategy,
            output = %self.config.assets.output.display(),
            "Running encoding engine"
        );
        self.execute_port.run(&invocation.args()).await?;

        let handoff = Handoff::new(
            &self.config.handoff,
            &request.tagline,
            plan.duration.total,
            &self.config.assets.output,
        )?;
        handoff.export(&self.config.handoff)?;

        Ok(Rendered {
            normalization,
            graph,
            handoff,
        })
    }

    /// A clip whose audio cannot be probed is treated as silent
    async fn probe_source_audio(&self, clip: &Path) -> bool {
        match self.probe_port.has_audio_stream(clip).await {
            Ok(has_audio) => {
                info!(has_audio, "Source clip probed");
                has_audio
            }
            Err(e) => {
                warn!(error = %e, "Could not probe source audio; treating clip as silent");
                false
            }
        }
    }

    fn invocation(
        &self,
        request: &CompositionRequest,
        plan: &CompositionPlan,
        graph: &FilterGraph,
        bgm: Option<PathBuf>,
        script: PathBuf,
    ) -> EngineInvocation {
        EngineInvocation::new(
            &request.source_clip,
            bgm,
            plan.duration.total,
            script,
            graph,
            self.config.encoder.clone(),
            &self.config.assets.output,
        )
    }

    fn create_scratch(&self) -> ShortcastResult<TempDir> {
        let root = &self.config.assets.scratch_root;
        std::fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(root)?;
        info!(scratch = %dir.path().display(), "Scratch directory created");
        Ok(dir)
    }

    /// Drop the scratch directory unless configured to keep it
    fn release_scratch(&self, scratch: TempDir) -> Option<PathBuf> {
        if self.config.assets.keep_scratch {
            #[allow(deprecated)]
            let kept = scratch.into_path();
            info!(scratch = %kept.display(), "Scratch directory kept");
            Some(kept)
        } else {
            None
        }
    }
}
