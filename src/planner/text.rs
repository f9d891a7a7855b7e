//! Tagline wrapping against an estimated glyph width

use crate::domain::model::WrappedText;

/// Average glyph width as a fraction of the font size
pub const GLYPH_WIDTH_RATIO: f64 = 0.56;
/// Largest safe margin per side, as a fraction of canvas width
pub const MAX_MARGIN_FRACTION: f64 = 0.2;

/// Greedy word wrapper bounded by a line ceiling
#[derive(Debug, Clone)]
pub struct TextWrapper {
    canvas_width: u32,
    font_size: u32,
    margin: f64,
    max_lines: usize,
}

impl TextWrapper {
    /// Create a wrapper; the margin is clamped to [0, 0.2] and at least one line is allowed
    pub fn new(canvas_width: u32, font_size: u32, margin: f64, max_lines: usize) -> Self {
        let margin = if margin.is_finite() {
            margin.clamp(0.0, MAX_MARGIN_FRACTION)
        } else {
            0.0
        };
        Self {
            canvas_width,
            font_size,
            margin,
            max_lines: max_lines.max(1),
        }
    }

    /// Horizontal space available to text, in pixels
    pub fn safe_width(&self) -> f64 {
        self.canvas_width as f64 * (1.0 - 2.0 * self.margin)
    }

    fn glyph_width(&self) -> f64 {
        self.font_size as f64 * GLYPH_WIDTH_RATIO
    }

    /// Characters that fit on one line within the safe width, never fewer than one
    pub fn max_chars(&self) -> usize {
        let glyph = self.glyph_width();
        if glyph <= 0.0 {
            return usize::MAX;
        }
        ((self.safe_width() / glyph).floor() as usize).max(1)
    }

    /// Estimated rendered width of a line, in pixels
    pub fn estimated_width(&self, line: &str) -> f64 {
        line.chars().count() as f64 * self.glyph_width()
    }

    /// Wrap text into at most `max_lines` lines
    ///
    /// Words are never split. Once only the last line remains, every remaining word is
    /// appended to it and the result is marked `forced` if that overflows the budget.
    pub fn wrap(&self, text: &str) -> WrappedText {
        let budget = self.max_chars();
        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;
        let mut forced = false;

        for word in text.split_whitespace() {
            let word_len = word.chars().count();
            if current.is_empty() {
                current.push_str(word);
                current_len = word_len;
                continue;
            }

            let candidate_len = current_len + 1 + word_len;
            let on_last_line = lines.len() + 1 >= self.max_lines;
            if candidate_len <= budget || on_last_line {
                forced |= candidate_len > budget;
                current.push(' ');
                current.push_str(word);
                current_len = candidate_len;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_len = word_len;
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }

        WrappedText { lines, forced }
    }
}
