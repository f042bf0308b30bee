//! # Gloss Resolver
//!
//! Turns a gloss token sequence into an ordered list of clip paths using
//! greedy longest-match lookup against the [`Dictionary`](crate::dictionary::Dictionary).

pub mod greedy;
pub mod types;

pub use greedy::GlossResolver;
pub use types::{MissingPhrasePolicy, Resolution, ResolveIssue};
