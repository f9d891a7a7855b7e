//! Encoding engine integration: argument lists and the audio normalization chain

pub mod invocation;
pub mod normalize;

pub use invocation::{decode_args, EngineInvocation};
pub use normalize::AudioNormalizer;
