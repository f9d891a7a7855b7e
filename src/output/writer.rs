//! Scratch file writing for a single composition run

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::model::WrappedText;
use crate::error::ShortcastResult;
use crate::graph::FilterGraph;

/// Tagline text file consumed by the text draw stage
pub const TAGLINE_FILE: &str = "tagline.txt";
/// Filter-graph program consumed by the engine
pub const PROGRAM_FILE: &str = "filters.txt";

/// Writer for the per-run scratch directory
pub struct ScratchWriter {
    dir: PathBuf,
}

impl ScratchWriter {
    /// Create a writer rooted at an existing directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the tagline file, whether or not it exists yet
    pub fn tagline_path(&self) -> PathBuf {
        self.dir.join(TAGLINE_FILE)
    }

    /// Location of the program file, whether or not it exists yet
    pub fn program_path(&self) -> PathBuf {
        self.dir.join(PROGRAM_FILE)
    }

    /// Write the wrapped tagline, one display line per text line
    pub fn write_tagline(&self, wrapped: &WrappedText) -> ShortcastResult<PathBuf> {
        let path = self.tagline_path();
        fs::write(&path, wrapped.joined())?;
        debug!(path = %path.display(), lines = wrapped.line_count(), "Tagline written");
        Ok(path)
    }

    /// Write the program as a single line
    pub fn write_program(&self, graph: &FilterGraph) -> ShortcastResult<PathBuf> {
        let path = self.program_path();
        let program = graph.program();
        fs::write(&path, &program)?;
        debug!(path = %path.display(), bytes = program.len(), "Filter program written");
        Ok(path)
    }

    /// Create the parent directory of an output file
    pub fn ensure_output_directory(output: &Path) -> ShortcastResult<()> {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}
