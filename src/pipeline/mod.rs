//! # Translation Pipeline
//!
//! Composes the gloss resolver and the clip assembler into one
//! gloss-to-video run.

pub mod engine;

// Re-exports for convenience
pub use engine::{Translation, TranslationEngine};
