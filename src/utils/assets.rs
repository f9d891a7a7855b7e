//! Asset discovery: clips and background tracks by extension, taglines by line

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::domain::rules::pick_index;
use crate::error::{AssetCategory, ShortcastError, ShortcastResult};
use crate::ports::RandomSource;
use crate::utils::path::PathUtils;

/// Directory scanner and line reader for composition inputs
pub struct AssetCatalog;

impl AssetCatalog {
    /// Files directly inside `dir` whose extension matches, case-insensitively
    ///
    /// A missing directory yields an empty list. Results are sorted so a seeded random
    /// source always picks the same file.
    pub fn list_files(dir: &Path, extensions: &[String]) -> ShortcastResult<Vec<PathBuf>> {
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "Asset directory not found");
            return Ok(Vec::new());
        }

        let wanted: Vec<String> = extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect();

        let mut files = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let matches = PathUtils::extension(entry.path())
                .map(|ext| wanted.contains(&ext))
                .unwrap_or(false);
            if matches {
                files.push(entry.into_path());
            }
        }

        files.sort();
        Ok(files)
    }

    /// Non-empty trimmed lines of a text file
    pub fn read_lines(path: &Path) -> ShortcastResult<Vec<String>> {
        let content = fs::read_to_string(path)?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Pick one clip, failing when the directory has none
    pub fn pick_clip(
        dir: &Path,
        extensions: &[String],
        rng: &mut dyn RandomSource,
    ) -> ShortcastResult<PathBuf> {
        let mut clips = Self::list_files(dir, extensions)?;
        match pick_index(rng, clips.len()) {
            Some(index) => Ok(clips.swap_remove(index)),
            None => Err(ShortcastError::missing(AssetCategory::Clip, dir)),
        }
    }

    /// Pick one tagline, failing when the file is missing or has no usable lines
    pub fn pick_tagline(path: &Path, rng: &mut dyn RandomSource) -> ShortcastResult<String> {
        if !path.is_file() {
            return Err(ShortcastError::missing(AssetCategory::Tagline, path));
        }
        let mut lines = Self::read_lines(path)?;
        match pick_index(rng, lines.len()) {
            Some(index) => Ok(lines.swap_remove(index)),
            None => Err(ShortcastError::missing(AssetCategory::Tagline, path)),
        }
    }
}
