//! # Gloss Input
//!
//! Helpers that turn upstream output (generated gloss strings or plain text)
//! into the uppercase token sequence the resolver consumes.

pub mod text;

pub use text::{split_gloss, text_to_gloss};
