//! Shortcast Library
//!
//! Plans and renders short vertical videos: tagline wrapping, display timing, frame
//! layout, a resilient background music chain and a filter-graph compiler feeding ffmpeg.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod graph;
pub mod output;
pub mod planner;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use config::ComposerConfig;
pub use domain::model::{CompositionPlan, CompositionRequest, NormalizationReport};
pub use error::{ShortcastError, ShortcastResult};
pub use graph::{FilterGraph, GraphCompiler};
pub use planner::CompositionPlanner;
