use std::time::Duration;

use thiserror::Error;

/// Main error type for the gloss-stitch library
#[derive(Error, Debug)]
pub enum GlossError {
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Errors raised while loading the dictionary table
///
/// Every variant is fatal and aborts before any resolution takes place.
#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("Failed to read dictionary table: {path} ({reason})")]
    LoadFailed { path: String, reason: String },

    #[error("Malformed dictionary table: {path} ({reason})")]
    ParseFailed { path: String, reason: String },

    #[error("Dictionary table {path} has no '{column}' column")]
    MissingColumn { path: String, column: String },
}

/// Errors raised while probing, normalizing and encoding clips
#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("Nothing to assemble: no clips were resolved")]
    EmptyInput,

    #[error("Failed to probe clip {path}: {reason}")]
    ProbeFailed { path: String, reason: String },

    #[error("Video encoding failed: {reason}")]
    EncodeFailed { reason: String },

    #[error("{tool} did not finish within {limit:?}")]
    Timeout { tool: String, limit: Duration },

    #[error("Media tool not found: {tool}")]
    ToolNotFound { tool: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using GlossError
pub type Result<T> = std::result::Result<T, GlossError>;

impl GlossError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// True when assembly was attempted with zero resolved clips
    pub fn is_nothing_to_assemble(&self) -> bool {
        matches!(self, Self::Assembly(AssemblyError::EmptyInput))
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Assembly(AssemblyError::EmptyInput) => {
                "No sign clips were found for the given input.".to_string()
            }
            Self::Dictionary(DictionaryError::LoadFailed { path, .. }) => {
                format!("Could not read the dictionary table '{}'. Please check the file exists.", path)
            }
            Self::Assembly(AssemblyError::ToolNotFound { tool }) => {
                format!("'{}' is not installed or not on PATH. Please install FFmpeg.", tool)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_distinct() {
        let err: GlossError = AssemblyError::EmptyInput.into();
        assert!(err.is_nothing_to_assemble());
        assert_eq!(err.user_message(), "No sign clips were found for the given input.");

        let other: GlossError = AssemblyError::EncodeFailed { reason: "disk full".into() }.into();
        assert!(!other.is_nothing_to_assemble());
    }

    #[test]
    fn test_missing_tool_message() {
        let err: GlossError = AssemblyError::ToolNotFound { tool: "ffmpeg".into() }.into();
        assert_eq!(err.user_message(), "'ffmpeg' is not installed or not on PATH. Please install FFmpeg.");

        let err: GlossError = AssemblyError::Timeout {
            tool: "ffmpeg".into(),
            limit: Duration::from_secs(5),
        }
        .into();
        assert!(err.user_message().contains("ffmpeg"));
    }
}
