use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::AssemblerConfig;
use crate::error::{AssemblyError, Result};
use crate::video::toolkit::{Encoder, Prober};
use crate::video::types::{AssemblyPlan, ClipGeometry};

/// Prober and encoder backed by the external `ffprobe` / `ffmpeg` binaries
#[derive(Debug, Clone)]
pub struct FfmpegToolkit {
    ffmpeg_bin: String,
    ffprobe_bin: String,
    probe_timeout: Duration,
    encode_timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

impl FfmpegToolkit {
    pub fn new(config: &AssemblerConfig) -> Self {
        Self {
            ffmpeg_bin: config.ffmpeg_bin.clone(),
            ffprobe_bin: config.ffprobe_bin.clone(),
            probe_timeout: config.probe_timeout(),
            encode_timeout: config.encode_timeout(),
        }
    }

    /// True when both binaries start and exit cleanly
    pub async fn check_available(&self) -> bool {
        for bin in [&self.ffmpeg_bin, &self.ffprobe_bin] {
            let ok = run_tool(bin, &["-version".to_string()], self.probe_timeout, |reason| {
                AssemblyError::EncodeFailed { reason }
            })
            .await
            .map(|output| output.status.success())
            .unwrap_or(false);
            if !ok {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl Prober for FfmpegToolkit {
    async fn probe(&self, path: &Path) -> Result<ClipGeometry> {
        let args = vec![
            "-v".to_string(),
            "error".to_string(),
            "-print_format".to_string(),
            "json".to_string(),
            "-show_streams".to_string(),
            "-select_streams".to_string(),
            "v".to_string(),
            path.display().to_string(),
        ];

        let output = run_tool(&self.ffprobe_bin, &args, self.probe_timeout, |reason| {
            AssemblyError::ProbeFailed {
                path: path.display().to_string(),
                reason,
            }
        })
        .await?;
        if !output.status.success() {
            return Err(AssemblyError::ProbeFailed {
                path: path.display().to_string(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        let geometry = parse_probe_output(&output.stdout).map_err(|reason| AssemblyError::ProbeFailed {
            path: path.display().to_string(),
            reason,
        })?;

        info!("Probed {}: {}", path.display(), geometry);
        Ok(geometry)
    }
}

#[async_trait]
impl Encoder for FfmpegToolkit {
    async fn encode(&self, plan: &AssemblyPlan, output: &Path) -> Result<()> {
        let args = plan.ffmpeg_args(output);
        debug!("Filter graph: {}", plan.filter_complex());

        let result = run_tool(&self.ffmpeg_bin, &args, self.encode_timeout, |reason| {
            AssemblyError::EncodeFailed { reason }
        })
        .await?;
        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(AssemblyError::EncodeFailed {
                reason: format!("FFmpeg failed: {}", stderr.trim()),
            }
            .into());
        }

        Ok(())
    }
}

/// Geometry of the first video stream in ffprobe's JSON output
fn parse_probe_output(stdout: &[u8]) -> std::result::Result<ClipGeometry, String> {
    let parsed: ProbeOutput =
        serde_json::from_slice(stdout).map_err(|e| format!("invalid ffprobe output: {}", e))?;

    let stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| "no video stream".to_string())?;

    match (stream.width, stream.height) {
        (Some(width), Some(height)) => ClipGeometry::new(width, height)
            .ok_or_else(|| format!("invalid frame size {}x{}", width, height)),
        _ => Err("video stream has no frame size".to_string()),
    }
}

/// Run an external tool to completion, killing it once `limit` elapses
///
/// A missing binary is always `ToolNotFound`; any other spawn failure is
/// turned into the caller's stage error by `spawn_failed`.
pub(crate) async fn run_tool<F>(
    bin: &str,
    args: &[String],
    limit: Duration,
    spawn_failed: F,
) -> Result<Output>
where
    F: FnOnce(String) -> AssemblyError,
{
    debug!("Running {} {}", bin, args.join(" "));

    let child = Command::new(bin)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AssemblyError::ToolNotFound { tool: bin.to_string() }
            } else {
                spawn_failed(format!("Failed to spawn {}: {}", bin, e))
            }
        })?;

    // Dropping the timed-out future drops the child, which kills it
    match tokio::time::timeout(limit, child.wait_with_output()).await {
        Ok(output) => Ok(output?),
        Err(_) => Err(AssemblyError::Timeout {
            tool: bin.to_string(),
            limit,
        }
        .into()),
    }
}
