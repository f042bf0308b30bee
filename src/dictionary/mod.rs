//! # Dictionary Index
//!
//! Loads the token/phrase to clip-file table and orders its keys for greedy
//! multi-word matching.

pub mod index;
pub mod loader;
pub mod types;

pub use index::{Dictionary, MatchIndex};
pub use loader::DictionaryLoader;
pub use types::{normalize_key, DictionaryEntry, DictionaryRow};
