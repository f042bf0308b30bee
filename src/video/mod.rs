//! # Clip Assembly Module
//!
//! Probes, normalizes, concatenates and encodes resolved clips into a single
//! output video. Media work is delegated to the [`Prober`] and [`Encoder`]
//! capabilities; [`FfmpegToolkit`] implements both with the external
//! ffprobe/ffmpeg binaries.

pub mod assembler;
pub mod ffmpeg;
pub mod locks;
pub mod toolkit;
pub mod types;

pub use assembler::ClipAssembler;
pub use ffmpeg::FfmpegToolkit;
pub use locks::OutputLocks;
pub use toolkit::{Encoder, Prober};
pub use types::{AssemblyPlan, ClipGeometry, EncodedVideo};
