//! Output side of a run: scratch files and the upload handoff

pub mod handoff;
pub mod writer;

pub use handoff::Handoff;
pub use writer::ScratchWriter;
