//! # Gloss-Stitch
//!
//! Turn a sign-language gloss into a single video by looking up a recorded
//! clip for every token or phrase and stitching the clips together.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gloss_stitch::{config::Config, pipeline::TranslationEngine};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let engine = TranslationEngine::from_config(&config)?;
//!
//! let translation = engine
//!     .translate_gloss(&["HELLO", "THANK", "YOU"], "output.mp4")
//!     .await?;
//! println!("{} clips -> {:?}", translation.video.clip_count, translation.video.path);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`dictionary`] - Loads the token/phrase table and orders keys for matching
//! - [`resolver`] - Greedy longest-match from gloss tokens to clip paths
//! - [`video`] - Probe, normalize, concatenate and encode clips
//! - [`pipeline`] - Resolver and assembler composed end to end
//! - [`gloss`] - Token helpers for upstream text and gloss strings
//! - [`config`] - Configuration management
//!
//! ## Testing Without FFmpeg
//!
//! The assembler only talks to media tooling through the
//! [`Prober`](video::Prober) and [`Encoder`](video::Encoder) traits:
//!
//! ```rust,no_run
//! use std::path::Path;
//! use async_trait::async_trait;
//! use gloss_stitch::video::{AssemblyPlan, ClipGeometry, Encoder, Prober};
//! use gloss_stitch::Result;
//!
//! struct FixedSize;
//!
//! #[async_trait]
//! impl Prober for FixedSize {
//!     async fn probe(&self, _path: &Path) -> Result<ClipGeometry> {
//!         Ok(ClipGeometry { width: 640, height: 480 })
//!     }
//! }
//!
//! struct NoopEncoder;
//!
//! #[async_trait]
//! impl Encoder for NoopEncoder {
//!     async fn encode(&self, _plan: &AssemblyPlan, output: &Path) -> Result<()> {
//!         std::fs::write(output, b"")?;
//!         Ok(())
//!     }
//! }
//! ```

pub mod config;
pub mod dictionary;
pub mod error;
pub mod gloss;
pub mod pipeline;
pub mod resolver;
pub mod video;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    dictionary::{Dictionary, DictionaryLoader},
    error::{GlossError, Result},
    pipeline::TranslationEngine,
    resolver::{GlossResolver, MissingPhrasePolicy},
    video::ClipAssembler,
};
