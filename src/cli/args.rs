//! Command-line argument definitions
//!
//! Every override also reads its environment variable, so the composer can be driven
//! entirely from a CI job's environment.

use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::Args;
use clap_num::number_range;

use crate::config::ComposerConfig;
use crate::domain::model::{DisplayMode, FitMode, MixMode, TextAnchor};
use crate::error::ShortcastResult;

fn parse_max_lines(s: &str) -> Result<usize, String> {
    number_range(s, 1, 8)
}

fn parse_font_size(s: &str) -> Result<u32, String> {
    number_range(s, 8, 400)
}

/// Configuration overrides shared by every command
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// Directory of source clips
    #[arg(long, env = "VIDEOS_DIR")]
    pub videos_dir: Option<PathBuf>,

    /// Tagline file, one tagline per line
    #[arg(long, env = "TAGLINES_TXT")]
    pub taglines: Option<PathBuf>,

    /// Directory of background music candidates
    #[arg(long, env = "BGM_DIR")]
    pub bgm_dir: Option<PathBuf>,

    /// Output video path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Parent directory for per-run scratch directories
    #[arg(long)]
    pub scratch_root: Option<PathBuf>,

    /// Keep the scratch directory after the run
    #[arg(long)]
    pub keep_scratch: bool,

    /// Exact duration in seconds (otherwise drawn between --min-duration and --max-duration)
    #[arg(long, env = "DURATION_SEC")]
    pub duration: Option<f64>,

    /// Lower bound of the random duration
    #[arg(long, env = "MIN_DUR")]
    pub min_duration: Option<f64>,

    /// Upper bound of the random duration
    #[arg(long, env = "MAX_DUR")]
    pub max_duration: Option<f64>,

    /// Audio mix mode: bgm or mix
    #[arg(long, env = "MIX_MODE")]
    pub mix_mode: Option<String>,

    /// Source audio volume
    #[arg(long, env = "VIDEO_VOL")]
    pub video_volume: Option<f64>,

    /// Background music volume
    #[arg(long, env = "BGM_VOL")]
    pub bgm_volume: Option<f64>,

    /// Keep the tagline on screen for the whole clip
    #[arg(
        long,
        env = "ALWAYS_ON_COPY",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub always_on: Option<bool>,

    /// Length of the opening headline window
    #[arg(long, env = "HEADLINE_SECS")]
    pub headline_seconds: Option<f64>,

    /// When the tagline reappears
    #[arg(long, env = "REAPPEAR_AT")]
    pub reappear_at: Option<f64>,

    /// Seconds before the end when the tagline disappears
    #[arg(long, env = "TAIL_OFF_SEC")]
    pub tail_off: Option<f64>,

    /// Frame fitting: cover or contain
    #[arg(long, env = "FIT_MODE")]
    pub fit_mode: Option<String>,

    /// Content inset fraction (0.8 to 1.0)
    #[arg(long, env = "INSET_PCT")]
    pub inset: Option<f64>,

    /// Tagline bar position: top, center or bottom
    #[arg(long, env = "TAG_POS")]
    pub tag_position: Option<String>,

    /// Font file for the tagline
    #[arg(long, env = "FONT_FILE")]
    pub font_file: Option<PathBuf>,

    /// Font size in pixels
    #[arg(long, env = "FONT_SIZE", value_parser = parse_font_size)]
    pub font_size: Option<u32>,

    /// Maximum number of tagline lines
    #[arg(long, env = "MAX_LINES", value_parser = parse_max_lines)]
    pub max_lines: Option<usize>,

    /// Horizontal safe margin per side, as a fraction of width
    #[arg(long, env = "TEXT_MARGIN_PCT")]
    pub text_margin: Option<f64>,

    /// Tagline color
    #[arg(long, env = "TEXT_COLOR")]
    pub text_color: Option<String>,

    /// Tagline border width
    #[arg(long, env = "TEXT_BORDERW")]
    pub text_border_width: Option<u32>,

    /// Tagline border color
    #[arg(long, env = "TEXT_BORDERCOLOR")]
    pub text_border_color: Option<String>,

    /// Bar color
    #[arg(long, env = "BAR_COLOR")]
    pub bar_color: Option<String>,

    /// Bar opacity (0 to 1)
    #[arg(long, env = "BAR_OPACITY")]
    pub bar_opacity: Option<f64>,

    /// Bar padding above and below the text, in pixels
    #[arg(long, env = "BAR_PAD_PX")]
    pub bar_padding: Option<u32>,

    /// Opacity of the box drawn tightly around the text (0 disables it)
    #[arg(long, env = "COPY_BOX_OPACITY")]
    pub copy_box_opacity: Option<f64>,

    /// Prefix of the handoff title
    #[arg(long, env = "TITLE_PREFIX")]
    pub title_prefix: Option<String>,

    /// Append handoff values to this env file
    #[arg(long, env = "GITHUB_ENV")]
    pub env_file: Option<PathBuf>,

    /// Write handoff values to this JSON file
    #[arg(long)]
    pub handoff_json: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Apply every override that was given on top of `config`
    pub fn apply_to(&self, config: &mut ComposerConfig) -> ShortcastResult<()> {
        let assets = &mut config.assets;
        set(&mut assets.videos_dir, &self.videos_dir);
        set(&mut assets.taglines_file, &self.taglines);
        set(&mut assets.bgm_dir, &self.bgm_dir);
        set(&mut assets.output, &self.output);
        set(&mut assets.scratch_root, &self.scratch_root);
        assets.keep_scratch |= self.keep_scratch;

        if self.duration.is_some() {
            config.duration.seconds = self.duration;
        }
        set(&mut config.duration.min, &self.min_duration);
        set(&mut config.duration.max, &self.max_duration);

        if let Some(mode) = &self.mix_mode {
            config.audio.mix_mode = MixMode::parse(mode)?;
        }
        set(&mut config.audio.video_volume, &self.video_volume);
        set(&mut config.audio.bgm_volume, &self.bgm_volume);

        if let Some(always_on) = self.always_on {
            config.display.mode = DisplayMode::from_always_on(always_on);
        }
        set(&mut config.display.headline_seconds, &self.headline_seconds);
        set(&mut config.display.reappear_at_seconds, &self.reappear_at);
        set(&mut config.display.tail_off_seconds, &self.tail_off);

        if let Some(fit) = &self.fit_mode {
            config.layout.fit_mode = FitMode::parse(fit)?;
        }
        set(&mut config.layout.inset, &self.inset);
        if let Some(anchor) = &self.tag_position {
            config.layout.anchor = TextAnchor::parse(anchor)?;
        }

        let text = &mut config.text;
        set(&mut text.font_file, &self.font_file);
        set(&mut text.font_size, &self.font_size);
        set(&mut text.max_lines, &self.max_lines);
        set(&mut text.margin, &self.text_margin);
        set(&mut text.color, &self.text_color);
        set(&mut text.border_width, &self.text_border_width);
        set(&mut text.border_color, &self.text_border_color);
        set(&mut text.box_opacity, &self.copy_box_opacity);

        set(&mut config.bar.color, &self.bar_color);
        set(&mut config.bar.opacity, &self.bar_opacity);
        set(&mut config.bar.padding, &self.bar_padding);

        let handoff = &mut config.handoff;
        set(&mut handoff.title_prefix, &self.title_prefix);
        if self.env_file.is_some() {
            handoff.env_file = self.env_file.clone();
        }
        if self.handoff_json.is_some() {
            handoff.json_file = self.handoff_json.clone();
        }

        Ok(())
    }
}

fn set<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

/// Arguments for the compose command
#[derive(Args, Debug)]
pub struct ComposeArgs {
    #[command(flatten)]
    pub overrides: ConfigOverrides,

    /// Print the composition result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub overrides: ConfigOverrides,

    /// Assume the source clip carries audio
    #[arg(long)]
    pub source_audio: bool,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the normalize command
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    #[command(flatten)]
    pub overrides: ConfigOverrides,

    /// Print the attempt log as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        overrides: ConfigOverrides,
    }

    fn parse(args: &[&str]) -> ConfigOverrides {
        let mut argv = vec!["harness"];
        argv.extend_from_slice(args);
        Harness::try_parse_from(argv).unwrap().overrides
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let overrides = parse(&[
            "--mix-mode",
            "MIX",
            "--fit-mode",
            "contain",
            "--inset",
            "0.9",
            "--tag-position",
            "bottom",
            "--duration",
            "12",
            "--max-lines",
            "3",
            "--always-on",
        ]);
        let mut config = ComposerConfig::default();
        overrides.apply_to(&mut config).unwrap();

        assert_eq!(config.audio.mix_mode, MixMode::Mix);
        assert_eq!(config.layout.fit_mode, FitMode::Contain);
        assert_eq!(config.layout.inset, 0.9);
        assert_eq!(config.layout.anchor, TextAnchor::Bottom);
        assert_eq!(config.duration.seconds, Some(12.0));
        assert_eq!(config.text.max_lines, 3);
        assert_eq!(config.display.mode, DisplayMode::AlwaysOn);
    }

    #[test]
    fn test_absent_overrides_keep_values() {
        let mut config = ComposerConfig::default();
        config.bar.opacity = 0.5;
        ConfigOverrides::default().apply_to(&mut config).unwrap();
        assert_eq!(config.bar.opacity, 0.5);
        assert_eq!(config.display.mode, DisplayMode::HeadlineReappear);
    }

    #[test]
    fn test_always_on_accepts_boolish_values() {
        assert_eq!(parse(&["--always-on", "0"]).always_on, Some(false));
        assert_eq!(parse(&["--always-on=1"]).always_on, Some(true));
    }

    #[test]
    fn test_unknown_enum_value_is_config_error() {
        let overrides = parse(&["--fit-mode", "stretch"]);
        let mut config = ComposerConfig::default();
        assert!(overrides.apply_to(&mut config).is_err());
    }

    #[test]
    fn test_max_lines_range() {
        let argv = ["harness", "--max-lines", "0"];
        assert!(Harness::try_parse_from(argv).is_err());
    }
}
