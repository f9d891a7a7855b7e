//! Path utilities for scratch file naming

use std::path::{Path, PathBuf};

use crate::error::ShortcastResult;

/// Stem used when nothing ASCII survives sanitization
const FALLBACK_STEM: &str = "track";
/// Extension used when the original has none
const FALLBACK_EXTENSION: &str = "bin";

/// Path utilities for scratch copies and output locations
pub struct PathUtils;

impl PathUtils {
    /// Keep ASCII alphanumerics, `-` and `_`; collapse everything else into single `_`
    pub fn ascii_component(raw: &str) -> String {
        let mut cleaned = String::with_capacity(raw.len());
        for ch in raw.chars() {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                cleaned.push(ch);
            } else if !cleaned.ends_with('_') {
                cleaned.push('_');
            }
        }
        cleaned.trim_matches('_').to_string()
    }

    /// Scratch file name for a background candidate: `bgm-<NN>-<stem>.<ext>`
    ///
    /// The index prefix keeps names unique within a run even when two originals
    /// sanitize to the same stem.
    pub fn sanitized_file_name(index: usize, original: &Path) -> String {
        let stem = original
            .file_stem()
            .map(|stem| Self::ascii_component(&stem.to_string_lossy()))
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| FALLBACK_STEM.to_string());

        let extension = original
            .extension()
            .map(|ext| Self::ascii_component(&ext.to_string_lossy()).to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());

        format!("bgm-{:02}-{}.{}", index, stem, extension)
    }

    /// Name of the normalized WAV produced for candidate `index`
    pub fn normalized_file_name(index: usize) -> String {
        format!("bgm-{:02}-norm.wav", index)
    }

    /// Resolve a path against the current directory without touching the filesystem
    pub fn absolute(path: &Path) -> ShortcastResult<PathBuf> {
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }
        Ok(std::env::current_dir()?.join(path))
    }

    /// Lowercased extension, if any
    pub fn extension(path: &Path) -> Option<String> {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }
}
