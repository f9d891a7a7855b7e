// Domain rules - Business logic and policies

use serde::Serialize;

use crate::domain::model::*;
use crate::ports::RandomSource;

/// Which audio sub-graph the compiler emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AudioStrategy {
    /// Source audio and background music at independent volumes
    Mix,
    /// Background music only, source audio discarded
    BgmOnly,
    /// Source audio only
    SourceOnly,
    /// No audio stream in the output
    Silent,
}

impl AudioStrategy {
    /// Select the audio strategy from the availability facts and the mix mode
    pub fn select(has_source_audio: bool, has_usable_bgm: bool, mix_mode: MixMode) -> Self {
        match (has_source_audio, has_usable_bgm) {
            (true, true) if mix_mode == MixMode::Mix => AudioStrategy::Mix,
            (_, true) => AudioStrategy::BgmOnly,
            (true, false) => AudioStrategy::SourceOnly,
            (false, false) => AudioStrategy::Silent,
        }
    }

    /// Whether the background track must be passed to the engine
    pub fn uses_bgm(&self) -> bool {
        matches!(self, AudioStrategy::Mix | AudioStrategy::BgmOnly)
    }

    /// Whether the source clip's audio is read
    pub fn uses_source(&self) -> bool {
        matches!(self, AudioStrategy::Mix | AudioStrategy::SourceOnly)
    }

    /// Whether an audio output label is produced
    pub fn has_output(&self) -> bool {
        !matches!(self, AudioStrategy::Silent)
    }
}

/// Business rules for resolving the composition length
pub struct DurationResolver;

impl DurationResolver {
    /// Resolve the total duration from an explicit value or a uniform draw
    ///
    /// The draw is rounded to hundredths before clamping. Non-finite explicit values are
    /// ignored and inverted bounds are swapped.
    pub fn resolve(
        explicit: Option<f64>,
        min: f64,
        max: f64,
        rng: &mut dyn RandomSource,
    ) -> DurationPlan {
        if let Some(seconds) = explicit.filter(|s| s.is_finite()) {
            return DurationPlan::clamped(round_hundredths(seconds));
        }

        let (low, high) = Self::bounds(min, max);
        let drawn = low + rng.next_f64() * (high - low);
        DurationPlan::clamped(round_hundredths(drawn))
    }

    fn bounds(min: f64, max: f64) -> (f64, f64) {
        let min = if min.is_finite() { min } else { MIN_TOTAL_SECONDS };
        let max = if max.is_finite() { max } else { MAX_TOTAL_SECONDS };
        if min <= max {
            (min, max)
        } else {
            (max, min)
        }
    }
}

fn round_hundredths(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}

/// Pick a uniformly random index into a collection of `len` items
pub fn pick_index(rng: &mut dyn RandomSource, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let index = (rng.next_f64() * len as f64).floor() as usize;
    Some(index.min(len - 1))
}

/// Fisher-Yates shuffle driven by the injected random source
pub fn shuffle<T>(rng: &mut dyn RandomSource, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = ((rng.next_f64() * (i + 1) as f64).floor() as usize).min(i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests;
