//! Composer configuration
//!
//! One immutable [`ComposerConfig`] is built at the process boundary (defaults, then an
//! optional TOML/YAML file, then environment variables and CLI flags) and passed into every
//! planner. Nothing below the CLI reads ambient state.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::model::{Canvas, DisplayMode, FitMode, MixMode, TextAnchor};
use crate::error::{ShortcastError, ShortcastResult};

pub mod loader;

pub use loader::ConfigLoader;

/// Complete composer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    pub assets: AssetConfig,
    pub duration: DurationConfig,
    pub audio: AudioConfig,
    pub display: DisplayConfig,
    pub layout: LayoutConfig,
    pub text: TextConfig,
    pub bar: BarConfig,
    pub encoder: EncoderConfig,
    pub handoff: HandoffConfig,
}

impl ComposerConfig {
    /// Reject values no clamp can repair
    pub fn validate(&self) -> ShortcastResult<()> {
        if self.layout.canvas_width == 0 || self.layout.canvas_height == 0 {
            return Err(ShortcastError::config("canvas dimensions cannot be zero"));
        }
        if self.text.font_size == 0 {
            return Err(ShortcastError::config("font size must be positive"));
        }
        if self.text.max_lines == 0 {
            return Err(ShortcastError::config("max lines must be at least 1"));
        }
        if self.assets.video_extensions.is_empty() {
            return Err(ShortcastError::config("no video extensions configured"));
        }
        Ok(())
    }
}

/// Where inputs come from and where outputs go
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub videos_dir: PathBuf,
    pub taglines_file: PathBuf,
    pub bgm_dir: PathBuf,
    pub output: PathBuf,
    /// Parent directory for the per-run scratch directory
    pub scratch_root: PathBuf,
    /// Leave the scratch directory behind for debugging
    pub keep_scratch: bool,
    pub video_extensions: Vec<String>,
    pub audio_extensions: Vec<String>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            videos_dir: PathBuf::from("assets/videos/en"),
            taglines_file: PathBuf::from("data/en/taglines.txt"),
            bgm_dir: PathBuf::from("assets/bgm/en"),
            output: PathBuf::from("final.mp4"),
            scratch_root: PathBuf::from("out"),
            keep_scratch: false,
            video_extensions: vec!["mp4".into(), "mov".into(), "mkv".into()],
            audio_extensions: vec!["mp3".into(), "wav".into(), "m4a".into()],
        }
    }
}

/// Duration request: explicit seconds or random bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationConfig {
    pub seconds: Option<f64>,
    pub min: f64,
    pub max: f64,
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            seconds: None,
            min: 10.0,
            max: 25.0,
        }
    }
}

/// Audio mixing preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub mix_mode: MixMode,
    pub video_volume: f64,
    pub bgm_volume: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            mix_mode: MixMode::Bgm,
            video_volume: 1.0,
            bgm_volume: 0.28,
        }
    }
}

/// Tagline schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub mode: DisplayMode,
    pub headline_seconds: f64,
    pub reappear_at_seconds: f64,
    pub tail_off_seconds: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mode: DisplayMode::HeadlineReappear,
            headline_seconds: 3.0,
            reappear_at_seconds: 11.0,
            tail_off_seconds: 0.8,
        }
    }
}

/// Frame fitting and tagline placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub fit_mode: FitMode,
    /// Fraction of the canvas the content occupies; clamped to [0.8, 1.0]
    pub inset: f64,
    pub anchor: TextAnchor,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl LayoutConfig {
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.canvas_width, self.canvas_height)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let canvas = Canvas::vertical_hd();
        Self {
            fit_mode: FitMode::Cover,
            inset: 1.0,
            anchor: TextAnchor::Center,
            canvas_width: canvas.width,
            canvas_height: canvas.height,
        }
    }
}

/// Tagline font and styling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub font_file: PathBuf,
    pub font_size: u32,
    pub max_lines: usize,
    /// Safe horizontal margin per side, as a fraction of canvas width
    pub margin: f64,
    pub color: String,
    pub border_width: u32,
    pub border_color: String,
    /// Legacy per-glyph box behind the text; 0 disables it
    pub box_opacity: f64,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_file: PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"),
            font_size: 72,
            max_lines: 2,
            margin: 0.06,
            color: "black".to_string(),
            border_width: 2,
            border_color: "black".to_string(),
            box_opacity: 0.0,
        }
    }
}

/// Full-width background bar behind the tagline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarConfig {
    pub color: String,
    pub opacity: f64,
    pub padding: u32,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            color: "white".to_string(),
            opacity: 0.35,
            padding: 18,
        }
    }
}

/// Engine binaries and encoder settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub ffmpeg: String,
    pub ffprobe: String,
    pub video_codec: String,
    pub preset: String,
    pub frame_rate: u32,
    pub audio_codec: String,
    pub audio_bitrate: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            video_codec: "libx264".to_string(),
            preset: "medium".to_string(),
            frame_rate: 30,
            audio_codec: "aac".to_string(),
            audio_bitrate: "128k".to_string(),
        }
    }
}

/// Values handed to the upload collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandoffConfig {
    pub title_prefix: String,
    /// Description lines; `{tagline}` and `{duration}` are substituted
    pub description: Vec<String>,
    /// Append `KEY=value` lines here (CI env file)
    pub env_file: Option<PathBuf>,
    /// Write the handoff as JSON here
    pub json_file: Option<PathBuf>,
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            title_prefix: "Road to 2112".to_string(),
            description: vec![
                "https://hub.sassamahha.me".to_string(),
                String::new(),
                "#RoadTo2112 #ShortStory #SciFi #HumansAndRobots".to_string(),
            ],
            env_file: None,
            json_file: None,
        }
    }
}
