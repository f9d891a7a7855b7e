//! Structured argument lists for the encoding engine

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::EncoderConfig;
use crate::domain::model::DecodeStrategy;
use crate::graph::{format_number, FilterGraph};

/// Sample rate of normalized background tracks
pub const NORMALIZED_SAMPLE_RATE: u32 = 44_100;
/// Channel count of normalized background tracks
pub const NORMALIZED_CHANNELS: u32 = 2;
/// Container format forced by the fallback decode strategy
pub const FORCED_INPUT_FORMAT: &str = "mp3";

/// Final composition run: inputs, trim, graph script, maps and encoder settings
#[derive(Debug, Clone, Serialize)]
pub struct EngineInvocation {
    pub source_clip: PathBuf,
    /// Normalized background track, looped to cover the duration
    pub bgm: Option<PathBuf>,
    pub duration: f64,
    pub script: PathBuf,
    pub video_map: String,
    /// Absent when the output is silent
    pub audio_map: Option<String>,
    pub encoder: EncoderConfig,
    pub output: PathBuf,
}

impl EngineInvocation {
    /// Create an invocation whose maps follow the compiled graph's output labels
    pub fn new(
        source_clip: impl Into<PathBuf>,
        bgm: Option<PathBuf>,
        duration: f64,
        script: impl Into<PathBuf>,
        graph: &FilterGraph,
        encoder: EncoderConfig,
        output: impl Into<PathBuf>,
    ) -> Self {
        let bgm = bgm.filter(|_| graph.audio_strategy.uses_bgm());
        Self {
            source_clip: source_clip.into(),
            bgm,
            duration,
            script: script.into(),
            video_map: graph.video_output().to_string(),
            audio_map: graph.audio_output().map(|label| label.to_string()),
            encoder,
            output: output.into(),
        }
    }

    /// Number of `-i` inputs the graph may refer to
    pub fn input_count(&self) -> usize {
        1 + usize::from(self.bgm.is_some())
    }

    /// Render the argument list
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(32);
        args.push("-y".into());
        args.push("-hide_banner".into());
        args.push("-i".into());
        args.push(self.source_clip.clone().into_os_string());

        if let Some(bgm) = &self.bgm {
            args.push("-stream_loop".into());
            args.push("-1".into());
            args.push("-i".into());
            args.push(bgm.clone().into_os_string());
        }

        args.push("-t".into());
        args.push(format_number(self.duration).into());
        args.push("-filter_complex_script".into());
        args.push(self.script.clone().into_os_string());
        args.push("-map".into());
        args.push(self.video_map.clone().into());

        match &self.audio_map {
            Some(label) => {
                args.push("-map".into());
                args.push(label.clone().into());
            }
            None => args.push("-an".into()),
        }

        args.push("-shortest".into());
        args.push("-c:v".into());
        args.push(self.encoder.video_codec.clone().into());
        args.push("-preset".into());
        args.push(self.encoder.preset.clone().into());
        args.push("-r".into());
        args.push(self.encoder.frame_rate.to_string().into());

        if self.audio_map.is_some() {
            args.push("-c:a".into());
            args.push(self.encoder.audio_codec.clone().into());
            args.push("-b:a".into());
            args.push(self.encoder.audio_bitrate.clone().into());
        }

        args.push(self.output.clone().into_os_string());
        args
    }
}

/// Decode a background candidate into stereo 44.1 kHz PCM WAV
pub fn decode_args(strategy: DecodeStrategy, input: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-y",
        "-hide_banner",
        "-probesize",
        "100M",
        "-analyzeduration",
        "100M",
        "-fflags",
        "+discardcorrupt",
        "-err_detect",
        "ignore_err",
    ]
    .iter()
    .map(OsString::from)
    .collect();

    if strategy == DecodeStrategy::ForcedFormat {
        args.push("-f".into());
        args.push(FORCED_INPUT_FORMAT.into());
    }

    args.push("-i".into());
    args.push(input.as_os_str().to_os_string());
    args.push("-vn".into());
    args.push("-ac".into());
    args.push(NORMALIZED_CHANNELS.to_string().into());
    args.push("-ar".into());
    args.push(NORMALIZED_SAMPLE_RATE.to_string().into());
    args.push("-c:a".into());
    args.push("pcm_s16le".into());
    args.push(output.as_os_str().to_os_string());
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ComposerConfig;
    use crate::domain::model::{DisplayMode, FitMode, MixMode};
    use crate::graph::GraphCompiler;
    use crate::planner::{LayoutPlanner, TimingPlanner};

    fn graph(has_source: bool, has_bgm: bool) -> FilterGraph {
        let config = ComposerConfig::default();
        let mut audio = config.audio.clone();
        audio.mix_mode = MixMode::Mix;
        let timing = TimingPlanner::new(DisplayMode::AlwaysOn, 3.0, 11.0, 0.8).plan(12.5);
        let mut layout_config = config.layout.clone();
        layout_config.fit_mode = FitMode::Cover;
        let layout = LayoutPlanner::from_config(&layout_config, &config.text, &config.bar).plan();
        GraphCompiler::new(config.text, config.bar, audio).compile(
            &timing,
            &layout,
            Path::new("/scratch/tagline.txt"),
            has_source,
            has_bgm,
        )
    }

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    fn invocation(has_source: bool, bgm: Option<&str>) -> EngineInvocation {
        EngineInvocation::new(
            "/clips/a.mp4",
            bgm.map(PathBuf::from),
            12.5,
            "/scratch/filters.txt",
            &graph(has_source, bgm.is_some()),
            EncoderConfig::default(),
            "/out/final.mp4",
        )
    }

    #[test]
    fn test_mixed_invocation() {
        let args = strings(&invocation(true, Some("/scratch/bgm-00-norm.wav")).args());
        assert_eq!(
            args,
            vec![
                "-y", "-hide_banner", "-i", "/clips/a.mp4", "-stream_loop", "-1", "-i",
                "/scratch/bgm-00-norm.wav", "-t", "12.5", "-filter_complex_script",
                "/scratch/filters.txt", "-map", "[v]", "-map", "[aout]", "-shortest", "-c:v",
                "libx264", "-preset", "medium", "-r", "30", "-c:a", "aac", "-b:a", "128k",
                "/out/final.mp4",
            ]
        );
    }

    #[test]
    fn test_silent_invocation() {
        let invocation = invocation(false, None);
        assert_eq!(invocation.input_count(), 1);
        let args = strings(&invocation.args());
        assert!(args.contains(&"-an".to_string()));
        assert!(!args.contains(&"-c:a".to_string()));
        assert!(!args.contains(&"-stream_loop".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("/out/final.mp4"));
    }

    #[test]
    fn test_source_only_invocation_maps_audio() {
        let args = strings(&invocation(true, None).args());
        assert!(args.windows(2).any(|w| w == ["-map", "[aout]"]));
        assert!(!args.contains(&"-an".to_string()));
    }

    #[test]
    fn test_probe_strategy_args() {
        let args = strings(&decode_args(
            DecodeStrategy::Probe,
            Path::new("/s/bgm-00-song.mp3"),
            Path::new("/s/bgm-00-norm.wav"),
        ));
        assert!(!args.contains(&"-f".to_string()));
        let input = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[input + 1], "/s/bgm-00-song.mp3");
        assert!(args[..input].contains(&"+discardcorrupt".to_string()));
        assert_eq!(
            &args[input + 2..],
            ["-vn", "-ac", "2", "-ar", "44100", "-c:a", "pcm_s16le", "/s/bgm-00-norm.wav"]
        );
    }

    #[test]
    fn test_forced_format_precedes_input() {
        let args = strings(&decode_args(
            DecodeStrategy::ForcedFormat,
            Path::new("in.bin"),
            Path::new("out.wav"),
        ));
        let format = args.iter().position(|a| a == "-f").unwrap();
        let input = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[format + 1], "mp3");
        assert!(format < input);
    }
}
