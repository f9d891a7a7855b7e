//! Tagline schedule and fade instants derived from the total duration

use crate::config::DisplayConfig;
use crate::domain::model::{DisplayMode, TimeWindow, TimingPlan};

/// Length of the video fade-in and fade-out
pub const VIDEO_FADE_SECONDS: f64 = 0.35;
/// Length of the audio fade-in and fade-out
pub const AUDIO_FADE_SECONDS: f64 = 0.5;
/// The reappear window never starts later than this before the end
pub const REAPPEAR_LATEST_BEFORE_END: f64 = 0.5;
/// Gap between the headline end and the earliest reappear start (half a frame at 30 fps)
pub const WINDOW_GAP_SECONDS: f64 = 1.0 / 60.0;

/// Pure planner for display windows and fades
#[derive(Debug, Clone)]
pub struct TimingPlanner {
    mode: DisplayMode,
    headline_seconds: f64,
    reappear_at_seconds: f64,
    tail_off_seconds: f64,
}

impl TimingPlanner {
    /// Create a planner from explicit parameters
    pub fn new(
        mode: DisplayMode,
        headline_seconds: f64,
        reappear_at_seconds: f64,
        tail_off_seconds: f64,
    ) -> Self {
        Self {
            mode,
            headline_seconds: non_negative(headline_seconds),
            reappear_at_seconds: non_negative(reappear_at_seconds),
            tail_off_seconds: non_negative(tail_off_seconds),
        }
    }

    /// Create a planner from the display configuration
    pub fn from_config(config: &DisplayConfig) -> Self {
        Self::new(
            config.mode,
            config.headline_seconds,
            config.reappear_at_seconds,
            config.tail_off_seconds,
        )
    }

    /// Compute windows and fades for a composition of `total` seconds
    ///
    /// The headline window has priority: a reappear window that would start inside it or
    /// exactly at its end is pushed just past its end, or collapsed when there is no room
    /// left before the end guard.
    pub fn plan(&self, total: f64) -> TimingPlan {
        let total = non_negative(total);
        let visible_until = (total - self.tail_off_seconds).max(0.0);

        let (headline, reappear) = match self.mode {
            DisplayMode::AlwaysOn => (TimeWindow::new(0.0, visible_until), None),
            DisplayMode::HeadlineReappear => {
                let headline_end = self.headline_seconds.min(total);
                let latest_start = (total - REAPPEAR_LATEST_BEFORE_END).max(0.0);
                let earliest_start = if headline_end > 0.0 {
                    headline_end + WINDOW_GAP_SECONDS
                } else {
                    0.0
                };
                let start = self
                    .reappear_at_seconds
                    .max(earliest_start)
                    .min(latest_start);
                let end = if start < earliest_start {
                    start
                } else {
                    visible_until.max(start)
                };
                (
                    TimeWindow::new(0.0, headline_end),
                    Some(TimeWindow::new(start, end)),
                )
            }
        };

        TimingPlan {
            total,
            headline,
            reappear,
            video_fade_in: TimeWindow::new(0.0, VIDEO_FADE_SECONDS.min(total)),
            video_fade_out_start: (total - VIDEO_FADE_SECONDS).max(0.0),
            audio_fade_in: TimeWindow::new(0.0, AUDIO_FADE_SECONDS.min(total)),
            audio_fade_out_start: (total - AUDIO_FADE_SECONDS).max(0.0),
        }
    }
}

fn non_negative(seconds: f64) -> f64 {
    if seconds.is_finite() {
        seconds.max(0.0)
    } else {
        0.0
    }
}
