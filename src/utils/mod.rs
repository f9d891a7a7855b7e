//! Common utilities and helpers

pub mod assets;
pub mod logging;
pub mod path;

pub use assets::AssetCatalog;
pub use logging::{init_logging, LogFormat};
pub use path::PathUtils;

/// Utility functions for Shortcast
pub struct Utils;

impl Utils {
    /// Format seconds for display, e.g. `13.75s`
    pub fn format_seconds(seconds: f64) -> String {
        format!("{:.2}s", seconds)
    }

    /// Format file size for display
    pub fn format_file_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Cut a string to at most `max_chars` characters without splitting a code point
    pub fn truncate_chars(text: &str, max_chars: usize) -> String {
        text.chars().take(max_chars).collect()
    }
}
