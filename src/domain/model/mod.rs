// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{AudioConfig, BarConfig, DisplayConfig, LayoutConfig, TextConfig};
use crate::error::{ShortcastError, ShortcastResult};

/// Shortest video the composer will produce, in seconds
pub const MIN_TOTAL_SECONDS: f64 = 5.0;
/// Longest video the composer will produce, in seconds
pub const MAX_TOTAL_SECONDS: f64 = 60.0;

/// How the tagline is scheduled on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    /// Visible from the start until the tail-off point
    AlwaysOn,
    /// Shown as a headline, hidden, then shown again near the end
    HeadlineReappear,
}

impl DisplayMode {
    /// Parse display mode from string
    pub fn parse(mode_str: &str) -> ShortcastResult<Self> {
        match mode_str.trim().to_lowercase().as_str() {
            "always-on" | "always_on" | "always" => Ok(DisplayMode::AlwaysOn),
            "headline-reappear" | "headline_reappear" | "headline" => {
                Ok(DisplayMode::HeadlineReappear)
            }
            other => Err(ShortcastError::config(format!(
                "Invalid display mode: {}. Valid modes: always-on, headline-reappear",
                other
            ))),
        }
    }

    /// Display mode selected by the legacy always-on flag
    pub fn from_always_on(always_on: bool) -> Self {
        if always_on {
            DisplayMode::AlwaysOn
        } else {
            DisplayMode::HeadlineReappear
        }
    }
}

/// Strategy for reconciling the source aspect ratio with the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Scale up to fill, crop the overflow
    Cover,
    /// Scale down to fit, pad the remainder
    Contain,
}

impl FitMode {
    /// Parse fit mode from string
    pub fn parse(mode_str: &str) -> ShortcastResult<Self> {
        match mode_str.trim().to_lowercase().as_str() {
            "cover" => Ok(FitMode::Cover),
            "contain" => Ok(FitMode::Contain),
            other => Err(ShortcastError::config(format!(
                "Invalid fit mode: {}. Valid modes: cover, contain",
                other
            ))),
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitMode::Cover => write!(f, "cover"),
            FitMode::Contain => write!(f, "contain"),
        }
    }
}

/// Vertical anchor of the tagline bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Top,
    Center,
    Bottom,
}

impl TextAnchor {
    /// Parse text anchor from string
    pub fn parse(anchor_str: &str) -> ShortcastResult<Self> {
        match anchor_str.trim().to_lowercase().as_str() {
            "top" => Ok(TextAnchor::Top),
            "center" | "middle" => Ok(TextAnchor::Center),
            "bottom" => Ok(TextAnchor::Bottom),
            other => Err(ShortcastError::config(format!(
                "Invalid text anchor: {}. Valid anchors: top, center, bottom",
                other
            ))),
        }
    }
}

/// Whether background music replaces or joins the source audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MixMode {
    /// Background music only
    Bgm,
    /// Source audio and background music mixed
    Mix,
}

impl MixMode {
    /// Parse mix mode from string
    pub fn parse(mode_str: &str) -> ShortcastResult<Self> {
        match mode_str.trim().to_lowercase().as_str() {
            "bgm" => Ok(MixMode::Bgm),
            "mix" => Ok(MixMode::Mix),
            other => Err(ShortcastError::config(format!(
                "Invalid mix mode: {}. Valid modes: bgm, mix",
                other
            ))),
        }
    }
}

impl fmt::Display for MixMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MixMode::Bgm => write!(f, "bgm"),
            MixMode::Mix => write!(f, "mix"),
        }
    }
}

/// Output canvas in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// Create a new canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Default vertical short-form canvas
    pub fn vertical_hd() -> Self {
        Self::new(1080, 1920)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::vertical_hd()
    }
}

/// Resolved total length of the composition
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationPlan {
    pub total: f64,
}

impl DurationPlan {
    /// Create a duration plan, clamping into the supported range
    pub fn clamped(seconds: f64) -> Self {
        let total = if seconds.is_finite() {
            seconds.clamp(MIN_TOTAL_SECONDS, MAX_TOTAL_SECONDS)
        } else {
            MIN_TOTAL_SECONDS
        };
        Self { total }
    }
}

/// Closed time interval on the output clock
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    /// Create a new window; an end before the start collapses the window
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Length of the window in seconds
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// Zero-length windows never show anything
    pub fn is_empty(&self) -> bool {
        self.length() <= f64::EPSILON
    }

    /// Whether two windows share a stretch of positive length
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start.max(other.start) < self.end.min(other.end)
    }
}

/// When the tagline is visible and when fades happen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingPlan {
    pub total: f64,
    pub headline: TimeWindow,
    /// Absent in always-on mode
    pub reappear: Option<TimeWindow>,
    pub video_fade_in: TimeWindow,
    pub video_fade_out_start: f64,
    pub audio_fade_in: TimeWindow,
    pub audio_fade_out_start: f64,
}

impl TimingPlan {
    /// Windows that actually put the tagline on screen, in order
    pub fn visible_windows(&self) -> impl Iterator<Item = &TimeWindow> {
        std::iter::once(&self.headline)
            .chain(self.reappear.iter())
            .filter(|window| !window.is_empty())
    }
}

/// Resolved geometry of the frame and the tagline bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutPlan {
    pub canvas: Canvas,
    pub fit_mode: FitMode,
    pub inset: f64,
    /// Frame box the content is scaled into
    pub inner_width: u32,
    pub inner_height: u32,
    /// Symmetric margins around the inner frame
    pub pad_x: u32,
    pub pad_y: u32,
    pub bar_top: u32,
    pub bar_height: u32,
}

impl LayoutPlan {
    /// Whether the fit stages need a padding pass
    pub fn is_inset(&self) -> bool {
        self.inner_width < self.canvas.width || self.inner_height < self.canvas.height
    }

    /// Horizontal text position expression, always centered
    pub fn text_x_expr(&self) -> String {
        "(w-text_w)/2".to_string()
    }

    /// Vertical text position expression, centered inside the bar
    pub fn text_y_expr(&self) -> String {
        format!("({}+({}-text_h)/2)", self.bar_top, self.bar_height)
    }
}

/// Tagline split into display lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrappedText {
    pub lines: Vec<String>,
    /// The line ceiling pushed extra words onto the last line
    pub forced: bool,
}

impl WrappedText {
    /// Lines joined the way the text draw stage expects them
    pub fn joined(&self) -> String {
        self.lines.join("\n")
    }

    /// Single-line rendering for logs
    pub fn summary(&self) -> String {
        self.lines.join(" / ")
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Normalization status of one candidate audio file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioStatus {
    Untried,
    Normalized,
    Failed,
}

/// One background-audio candidate moving through the normalization chain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioAsset {
    pub original: PathBuf,
    /// ASCII-safe working copy in the scratch directory
    pub sanitized: PathBuf,
    pub normalized: Option<PathBuf>,
    pub status: AudioStatus,
}

impl AudioAsset {
    /// Create an untried asset
    pub fn new(original: impl Into<PathBuf>, sanitized: impl Into<PathBuf>) -> Self {
        Self {
            original: original.into(),
            sanitized: sanitized.into(),
            normalized: None,
            status: AudioStatus::Untried,
        }
    }

    /// Path of the decodable file, if normalization succeeded
    pub fn usable_path(&self) -> Option<&Path> {
        match self.status {
            AudioStatus::Normalized => self.normalized.as_deref(),
            _ => None,
        }
    }
}

/// Decode strategy tried against a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecodeStrategy {
    /// Let the decoder probe the container with relaxed tolerances
    Probe,
    /// Assume the common mislabeled container explicitly
    ForcedFormat,
}

impl fmt::Display for DecodeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeStrategy::Probe => write!(f, "probe"),
            DecodeStrategy::ForcedFormat => write!(f, "forced-format"),
        }
    }
}

/// Result of a single decode attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum AttemptOutcome {
    Succeeded,
    Failed { reason: String },
}

/// Entry in the normalization attempt log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizationAttempt {
    pub candidate: PathBuf,
    pub strategy: DecodeStrategy,
    pub outcome: AttemptOutcome,
    pub at: DateTime<Utc>,
}

impl NormalizationAttempt {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Succeeded)
    }
}

/// Everything the normalization chain did, derived from data rather than control flow
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizationReport {
    /// Candidates in the order they were considered
    pub assets: Vec<AudioAsset>,
    pub attempts: Vec<NormalizationAttempt>,
    pub selected: Option<AudioAsset>,
}

impl NormalizationReport {
    /// Path of the normalized background track, if any candidate was usable
    pub fn usable_path(&self) -> Option<&Path> {
        self.selected.as_ref().and_then(AudioAsset::usable_path)
    }

    /// Number of candidates that exhausted both strategies
    pub fn failed_count(&self) -> usize {
        self.assets
            .iter()
            .filter(|asset| asset.status == AudioStatus::Failed)
            .count()
    }

    /// One-line outcome of the chain, explicit when the composition goes without music
    pub fn summary(&self) -> String {
        match &self.selected {
            Some(asset) => format!("Using background track {}", asset.original.display()),
            None if self.assets.is_empty() => {
                "No background candidates found; continuing without music".to_string()
            }
            None => format!(
                "No usable background track among {} candidates; continuing without music",
                self.assets.len()
            ),
        }
    }
}

/// Fully gathered inputs for one composition
#[derive(Debug, Clone)]
pub struct CompositionRequest {
    pub source_clip: PathBuf,
    pub tagline: String,
    pub candidate_audio: Vec<PathBuf>,
    pub target_duration: Option<f64>,
    pub duration_bounds: (f64, f64),
    pub layout: LayoutConfig,
    pub text: TextConfig,
    pub bar: BarConfig,
    pub display: DisplayConfig,
    pub audio: AudioConfig,
}

/// The pure part of a composition: everything decided before any subprocess runs
#[derive(Debug, Clone, Serialize)]
pub struct CompositionPlan {
    pub duration: DurationPlan,
    pub wrapped: WrappedText,
    pub timing: TimingPlan,
    pub layout: LayoutPlan,
}
