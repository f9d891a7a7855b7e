//! Frame fitting and tagline bar geometry

use crate::config::{BarConfig, LayoutConfig, TextConfig};
use crate::domain::model::{Canvas, FitMode, LayoutPlan, TextAnchor};

/// Smallest inset the planner accepts
pub const MIN_INSET: f64 = 0.8;
/// Largest inset (content fills the canvas)
pub const MAX_INSET: f64 = 1.0;
/// Bar top for the `top` anchor, as a fraction of canvas height
pub const TOP_ANCHOR_FRACTION: f64 = 0.12;
/// Bar bottom for the `bottom` anchor, as a fraction of canvas height
pub const BOTTOM_ANCHOR_FRACTION: f64 = 0.82;

/// Pure planner for scale/crop/pad geometry and bar placement
#[derive(Debug, Clone)]
pub struct LayoutPlanner {
    canvas: Canvas,
    fit_mode: FitMode,
    inset: f64,
    anchor: TextAnchor,
    font_size: u32,
    bar_padding: u32,
}

impl LayoutPlanner {
    /// Create a planner; the inset is clamped into [0.8, 1.0]
    pub fn new(
        canvas: Canvas,
        fit_mode: FitMode,
        inset: f64,
        anchor: TextAnchor,
        font_size: u32,
        bar_padding: u32,
    ) -> Self {
        Self {
            canvas,
            fit_mode,
            inset: Self::clamp_inset(inset),
            anchor,
            font_size,
            bar_padding,
        }
    }

    /// Create a planner from the layout, text and bar configuration
    pub fn from_config(layout: &LayoutConfig, text: &TextConfig, bar: &BarConfig) -> Self {
        Self::new(
            layout.canvas(),
            layout.fit_mode,
            layout.inset,
            layout.anchor,
            text.font_size,
            bar.padding,
        )
    }

    /// Zero and non-finite insets mean "no inset"
    pub fn clamp_inset(inset: f64) -> f64 {
        if !inset.is_finite() || inset == 0.0 {
            return MAX_INSET;
        }
        inset.clamp(MIN_INSET, MAX_INSET)
    }

    /// Resolve the full layout
    pub fn plan(&self) -> LayoutPlan {
        let Canvas { width, height } = self.canvas;
        let inner_width = ((width as f64 * self.inset).round() as u32).min(width);
        let inner_height = ((height as f64 * self.inset).round() as u32).min(height);
        let (bar_top, bar_height) = self.bar_geometry();

        LayoutPlan {
            canvas: self.canvas,
            fit_mode: self.fit_mode,
            inset: self.inset,
            inner_width,
            inner_height,
            pad_x: (width - inner_width) / 2,
            pad_y: (height - inner_height) / 2,
            bar_top,
            bar_height,
        }
    }

    /// Bar top and height, kept fully inside the canvas
    fn bar_geometry(&self) -> (u32, u32) {
        let height = self.canvas.height as f64;
        let bar_height = (self.font_size as f64 + 2.0 * self.bar_padding as f64)
            .round()
            .min(height);

        let top = match self.anchor {
            TextAnchor::Top => (height * TOP_ANCHOR_FRACTION).round(),
            TextAnchor::Bottom => (height * BOTTOM_ANCHOR_FRACTION - bar_height).round(),
            TextAnchor::Center => ((height - bar_height) / 2.0).round(),
        };
        let top = top.clamp(0.0, height - bar_height);

        (top as u32, bar_height as u32)
    }
}
