//! Composition planning: wrapping, timing and layout
//!
//! Everything in this module is pure. Randomness arrives through the injected
//! [`RandomSource`], so a fixed source yields a fixed plan.

use tracing::debug;

use crate::domain::model::{CompositionPlan, CompositionRequest};
use crate::domain::rules::DurationResolver;
use crate::ports::RandomSource;

pub mod layout;
pub mod text;
pub mod timing;

pub use layout::LayoutPlanner;
pub use text::TextWrapper;
pub use timing::TimingPlanner;

/// Runs the planners in dependency order
pub struct CompositionPlanner;

impl CompositionPlanner {
    /// Resolve duration, wrap the tagline, then plan timing and layout
    pub fn plan(request: &CompositionRequest, rng: &mut dyn RandomSource) -> CompositionPlan {
        let (min, max) = request.duration_bounds;
        let duration = DurationResolver::resolve(request.target_duration, min, max, rng);

        let wrapped = TextWrapper::new(
            request.layout.canvas_width,
            request.text.font_size,
            request.text.margin,
            request.text.max_lines,
        )
        .wrap(&request.tagline);

        let timing = TimingPlanner::from_config(&request.display).plan(duration.total);
        let layout = LayoutPlanner::from_config(&request.layout, &request.text, &request.bar).plan();

        debug!(
            total = duration.total,
            lines = wrapped.line_count(),
            bar_top = layout.bar_top,
            "Composition planned"
        );

        CompositionPlan {
            duration,
            wrapped,
            timing,
            layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ComposerConfig;
    use std::path::PathBuf;

    struct Fixed(f64);

    impl RandomSource for Fixed {
        fn next_f64(&mut self) -> f64 {
            self.0
        }
    }

    fn request(target: Option<f64>) -> CompositionRequest {
        let config = ComposerConfig::default();
        CompositionRequest {
            source_clip: PathBuf::from("clip.mp4"),
            tagline: "Humans and robots build the road to 2112 together".to_string(),
            candidate_audio: Vec::new(),
            target_duration: target,
            duration_bounds: (config.duration.min, config.duration.max),
            layout: config.layout,
            text: config.text,
            bar: config.bar,
            display: config.display,
            audio: config.audio,
        }
    }

    #[test]
    fn test_plan_is_deterministic_for_fixed_source() {
        let a = CompositionPlanner::plan(&request(None), &mut Fixed(0.25));
        let b = CompositionPlanner::plan(&request(None), &mut Fixed(0.25));
        assert_eq!(a.duration, b.duration);
        assert_eq!(a.timing, b.timing);
        assert_eq!(a.duration.total, 13.75);
    }

    #[test]
    fn test_plan_uses_explicit_duration() {
        let plan = CompositionPlanner::plan(&request(Some(15.0)), &mut Fixed(0.9));
        assert_eq!(plan.duration.total, 15.0);
        assert_eq!(plan.timing.total, 15.0);
        assert_eq!(plan.wrapped.line_count(), 2);
        assert_eq!(plan.layout.bar_top, 906);
    }
}
