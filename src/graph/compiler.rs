//! Compile timing and layout plans into a filter-graph program

use std::path::Path;

use tracing::debug;

use crate::config::{AudioConfig, BarConfig, TextConfig};
use crate::domain::model::{FitMode, LayoutPlan, TimeWindow, TimingPlan};
use crate::domain::rules::AudioStrategy;
use crate::graph::{FilterChain, FilterGraph, Label, Stage, AUDIO_OUTPUT, VIDEO_OUTPUT};
use crate::planner::timing::{AUDIO_FADE_SECONDS, VIDEO_FADE_SECONDS};

/// Engine input index of the source clip
pub const SOURCE_INPUT: usize = 0;
/// Engine input index of the normalized background track
pub const BGM_INPUT: usize = 1;
/// Border around the legacy copy box, in pixels
pub const COPY_BOX_BORDER: u32 = 18;

/// Pure compiler from plans to a [`FilterGraph`]
#[derive(Debug, Clone)]
pub struct GraphCompiler {
    text: TextConfig,
    bar: BarConfig,
    audio: AudioConfig,
}

impl GraphCompiler {
    /// Create a compiler for the given styling and audio settings
    pub fn new(text: TextConfig, bar: BarConfig, audio: AudioConfig) -> Self {
        Self { text, bar, audio }
    }

    /// Build the full graph
    ///
    /// `textfile` is the scratch file holding the wrapped tagline; it is referenced by
    /// path so the tagline itself never passes through graph escaping.
    pub fn compile(
        &self,
        timing: &TimingPlan,
        layout: &LayoutPlan,
        textfile: &Path,
        has_source_audio: bool,
        has_usable_bgm: bool,
    ) -> FilterGraph {
        let strategy = AudioStrategy::select(has_source_audio, has_usable_bgm, self.audio.mix_mode);
        let video = self.video_chain(timing, layout, textfile);
        let audio = self.audio_chains(strategy, timing);

        debug!(
            strategy = ?strategy,
            video_stages = video.stages.len(),
            audio_chains = audio.len(),
            "Filter graph compiled"
        );

        FilterGraph {
            video,
            audio,
            audio_strategy: strategy,
        }
    }

    /// Source video through fit, fades and tagline overlays
    pub fn video_chain(
        &self,
        timing: &TimingPlan,
        layout: &LayoutPlan,
        textfile: &Path,
    ) -> FilterChain {
        let mut stages = Self::fit_stages(layout);

        stages.push(
            Stage::new("fade")
                .param("t", "in")
                .param("st", 0.0)
                .param("d", VIDEO_FADE_SECONDS),
        );
        stages.push(
            Stage::new("fade")
                .param("t", "out")
                .param("st", timing.video_fade_out_start)
                .param("d", VIDEO_FADE_SECONDS),
        );

        for window in timing.visible_windows() {
            stages.push(self.bar_stage(layout, window));
            stages.push(self.text_stage(layout, window, textfile));
        }

        FilterChain::new(
            vec![Label::video_input(SOURCE_INPUT)],
            stages,
            Label::new(VIDEO_OUTPUT),
        )
    }

    /// Scale, crop and pad stages for the planned fit
    pub fn fit_stages(layout: &LayoutPlan) -> Vec<Stage> {
        let width = layout.canvas.width;
        let height = layout.canvas.height;
        let mut stages = Vec::with_capacity(4);

        match layout.fit_mode {
            FitMode::Cover => {
                stages.push(
                    Stage::new("scale")
                        .param("w", width)
                        .param("h", height)
                        .param("force_original_aspect_ratio", "increase"),
                );
                stages.push(Stage::new("crop").param("w", width).param("h", height));
                if layout.is_inset() {
                    stages.push(
                        Stage::new("scale")
                            .param("w", layout.inner_width)
                            .param("h", layout.inner_height),
                    );
                    stages.push(Self::pad_stage(layout));
                }
            }
            FitMode::Contain => {
                stages.push(
                    Stage::new("scale")
                        .param("w", layout.inner_width)
                        .param("h", layout.inner_height)
                        .param("force_original_aspect_ratio", "decrease"),
                );
                stages.push(Self::pad_stage(layout));
            }
        }

        stages
    }

    fn pad_stage(layout: &LayoutPlan) -> Stage {
        Stage::new("pad")
            .param("w", layout.canvas.width)
            .param("h", layout.canvas.height)
            .expr("x", "(ow-iw)/2")
            .expr("y", "(oh-ih)/2")
    }

    fn bar_stage(&self, layout: &LayoutPlan, window: &TimeWindow) -> Stage {
        let opacity = self.bar.opacity.clamp(0.0, 1.0);
        Stage::new("drawbox")
            .param("x", 0i64)
            .param("y", layout.bar_top)
            .param("w", layout.canvas.width)
            .param("h", layout.bar_height)
            .escaped("color", format!("{}@{}", self.bar.color, super::format_number(opacity)))
            .param("t", "fill")
            .expr("enable", enable_expr(window))
    }

    fn text_stage(&self, layout: &LayoutPlan, window: &TimeWindow, textfile: &Path) -> Stage {
        let mut stage = Stage::new("drawtext")
            .path("fontfile", &self.text.font_file)
            .path("textfile", textfile)
            .param("expansion", "none")
            .param("fontsize", self.text.font_size)
            .escaped("fontcolor", self.text.color.clone())
            .param("borderw", self.text.border_width)
            .escaped("bordercolor", self.text.border_color.clone());

        let box_opacity = self.text.box_opacity.clamp(0.0, 1.0);
        if box_opacity > 0.0 {
            stage = stage
                .param("box", 1i64)
                .escaped(
                    "boxcolor",
                    format!("black@{}", super::format_number(box_opacity)),
                )
                .param("boxborderw", COPY_BOX_BORDER);
        }

        stage
            .expr("x", layout.text_x_expr())
            .expr("y", layout.text_y_expr())
            .expr("enable", enable_expr(window))
    }

    /// Audio chains for the selected strategy, ending in the audio output label
    pub fn audio_chains(&self, strategy: AudioStrategy, timing: &TimingPlan) -> Vec<FilterChain> {
        let source = Label::audio_input(SOURCE_INPUT);
        let bgm = Label::audio_input(BGM_INPUT);
        let output = Label::new(AUDIO_OUTPUT);

        match strategy {
            AudioStrategy::Mix => {
                let source_mix = Label::new("a0");
                let bgm_mix = Label::new("a1");
                let mut mix_stages = vec![Stage::new("amix")
                    .param("inputs", 2i64)
                    .param("duration", "first")
                    .param("dropout_transition", 2i64)];
                mix_stages.extend(Self::audio_fades(timing));

                vec![
                    FilterChain::new(
                        vec![source],
                        vec![volume(self.audio.video_volume)],
                        source_mix.clone(),
                    ),
                    FilterChain::new(vec![bgm], vec![volume(self.audio.bgm_volume)], bgm_mix.clone()),
                    FilterChain::new(vec![source_mix, bgm_mix], mix_stages, output),
                ]
            }
            AudioStrategy::BgmOnly => vec![self.single_track(bgm, self.audio.bgm_volume, timing)],
            AudioStrategy::SourceOnly => {
                vec![self.single_track(source, self.audio.video_volume, timing)]
            }
            AudioStrategy::Silent => Vec::new(),
        }
    }

    fn single_track(&self, input: Label, level: f64, timing: &TimingPlan) -> FilterChain {
        let mut stages = vec![volume(level)];
        stages.extend(Self::audio_fades(timing));
        FilterChain::new(vec![input], stages, Label::new(AUDIO_OUTPUT))
    }

    fn audio_fades(timing: &TimingPlan) -> [Stage; 2] {
        [
            Stage::new("afade")
                .param("t", "in")
                .param("st", 0.0)
                .param("d", AUDIO_FADE_SECONDS),
            Stage::new("afade")
                .param("t", "out")
                .param("st", timing.audio_fade_out_start)
                .param("d", AUDIO_FADE_SECONDS),
        ]
    }
}

fn volume(level: f64) -> Stage {
    let level = if level.is_finite() { level.max(0.0) } else { 1.0 };
    Stage::new("volume").param("volume", level)
}

fn enable_expr(window: &TimeWindow) -> String {
    format!(
        "between(t,{},{})",
        super::format_number(window.start),
        super::format_number(window.end)
    )
}
