use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, Result},
    resolver::MissingPhrasePolicy,
};

/// Main configuration for gloss-stitch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dictionary table and clip storage
    pub dictionary: DictionaryConfig,

    /// Gloss resolution settings
    pub resolver: ResolverConfig,

    /// Clip assembly settings
    pub assembler: AssemblerConfig,

    /// Text-to-gloss settings
    pub gloss: GlossConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.dictionary.validate()?;
        self.assembler.validate()?;
        Ok(())
    }
}

/// Where the dictionary table and the clips it references live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// CSV table with `path` and any of `token`, `phrase`, `word`
    pub table_path: PathBuf,

    /// Directory holding the clip files referenced by basename
    pub clip_dir: PathBuf,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            table_path: PathBuf::from("content/asl_app_data/asl_video_index_final_with_path_cleaned.csv"),
            clip_dir: PathBuf::from("content/asl_app_data/dictionary"),
        }
    }
}

impl DictionaryConfig {
    fn validate(&self) -> Result<()> {
        if self.table_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "dictionary.table_path".to_string(),
                value: String::new()
            }.into());
        }

        Ok(())
    }
}

/// Gloss resolution configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// What to do when a matched phrase has no clip on disk
    pub missing_phrase_policy: MissingPhrasePolicy,
}

/// Clip assembly configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblerConfig {
    /// Default output file when the caller does not name one
    pub output_path: PathBuf,

    /// Video codec passed to ffmpeg
    pub video_codec: String,

    /// Chroma format passed to ffmpeg
    pub pixel_format: String,

    /// ffmpeg executable
    pub ffmpeg_bin: String,

    /// ffprobe executable
    pub ffprobe_bin: String,

    /// Upper bound for a single probe (seconds)
    pub probe_timeout_secs: u64,

    /// Upper bound for the encode step (seconds)
    pub encode_timeout_secs: u64,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("output.mp4"),
            video_codec: "libx264".to_string(),
            pixel_format: "yuv420p".to_string(),
            ffmpeg_bin: "ffmpeg".to_string(),
            ffprobe_bin: "ffprobe".to_string(),
            probe_timeout_secs: 30,
            encode_timeout_secs: 600,
        }
    }
}

impl AssemblerConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn encode_timeout(&self) -> Duration {
        Duration::from_secs(self.encode_timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.probe_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "assembler.probe_timeout_secs".to_string(),
                value: self.probe_timeout_secs.to_string()
            }.into());
        }

        if self.encode_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "assembler.encode_timeout_secs".to_string(),
                value: self.encode_timeout_secs.to_string()
            }.into());
        }

        for (key, value) in [
            ("assembler.video_codec", &self.video_codec),
            ("assembler.pixel_format", &self.pixel_format),
            ("assembler.ffmpeg_bin", &self.ffmpeg_bin),
            ("assembler.ffprobe_bin", &self.ffprobe_bin),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.clone()
                }.into());
            }
        }

        Ok(())
    }
}

/// Rule-based text-to-gloss settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlossConfig {
    /// Words dropped from plain text before lookup
    pub stopwords: Vec<String>,
}

impl Default for GlossConfig {
    fn default() -> Self {
        Self {
            stopwords: vec!["A".to_string(), "AN".to_string(), "THE".to_string()],
        }
    }
}
