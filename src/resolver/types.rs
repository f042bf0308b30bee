use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What the resolver does when a matched phrase has no clip on disk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPhrasePolicy {
    /// Consume the whole phrase and emit nothing for it
    #[default]
    Drop,

    /// Report the phrase, then resolve the token at the cursor on its own
    Fallback,
}

impl FromStr for MissingPhrasePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop" => Ok(Self::Drop),
            "fallback" => Ok(Self::Fallback),
            other => Err(format!("unknown missing-phrase policy '{}' (expected drop or fallback)", other)),
        }
    }
}

impl fmt::Display for MissingPhrasePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drop => write!(f, "drop"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// Advisory problem met while resolving a gloss
///
/// None of these stop resolution; the affected tokens simply produce no path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveIssue {
    /// No dictionary entry for the token
    UnresolvedToken { token: String },

    /// Entry found but its clip file is absent
    MissingClipFile {
        key: String,
        path: PathBuf,
        phrase: bool,
    },
}

impl fmt::Display for ResolveIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedToken { token } => write!(f, "No mapping for token: {}", token),
            Self::MissingClipFile { key, path, phrase: true } => {
                write!(f, "File not found for phrase '{}': {}", key, path.display())
            }
            Self::MissingClipFile { key, path, phrase: false } => {
                write!(f, "File not found for token '{}': {}", key, path.display())
            }
        }
    }
}

/// Output of one resolution request
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Clip paths in left-to-right consumption order
    pub paths: Vec<PathBuf>,

    /// Advisories in the order they were met
    pub issues: Vec<ResolveIssue>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Tokens that had no dictionary entry
    pub fn unresolved_tokens(&self) -> impl Iterator<Item = &str> {
        self.issues.iter().filter_map(|issue| match issue {
            ResolveIssue::UnresolvedToken { token } => Some(token.as_str()),
            _ => None,
        })
    }

    /// Clip files that were mapped but missing on disk
    pub fn missing_clips(&self) -> impl Iterator<Item = &PathBuf> {
        self.issues.iter().filter_map(|issue| match issue {
            ResolveIssue::MissingClipFile { path, .. } => Some(path),
            _ => None,
        })
    }
}
