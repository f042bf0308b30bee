use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;
use crate::video::types::{AssemblyPlan, ClipGeometry};

/// Reads the frame size of a clip's first video stream
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<ClipGeometry>;
}

/// Executes an [`AssemblyPlan`], writing the encoded video to `output`
///
/// `output` may already exist and must be overwritten.
#[async_trait]
pub trait Encoder: Send + Sync {
    async fn encode(&self, plan: &AssemblyPlan, output: &Path) -> Result<()>;
}
