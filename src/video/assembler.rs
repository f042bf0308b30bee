use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::AssemblerConfig;
use crate::error::{AssemblyError, Result};
use crate::video::ffmpeg::FfmpegToolkit;
use crate::video::locks::OutputLocks;
use crate::video::toolkit::{Encoder, Prober};
use crate::video::types::{AssemblyPlan, EncodedVideo};

/// Probes, normalizes, concatenates and encodes resolved clips into one file
///
/// The steps run strictly in order:
/// 1. Probe - frame size of the first clip becomes the target geometry
/// 2. Normalize - every clip (the first included) is scaled to that size
/// 3. Concatenate - video-only streams are joined in input order
/// 4. Encode - the result replaces whatever sits at the output path
///
/// Assemblies sharing this assembler (or a clone of it) that target the same
/// output path are serialized. The encoder writes into a temporary file next
/// to the output which is renamed over it only after a successful encode.
#[derive(Clone)]
pub struct ClipAssembler {
    config: AssemblerConfig,
    prober: Arc<dyn Prober>,
    encoder: Arc<dyn Encoder>,
    locks: Arc<OutputLocks>,
}

impl ClipAssembler {
    pub fn new(config: AssemblerConfig, prober: Arc<dyn Prober>, encoder: Arc<dyn Encoder>) -> Self {
        Self {
            config,
            prober,
            encoder,
            locks: Arc::new(OutputLocks::new()),
        }
    }

    /// Assembler driving the external ffprobe/ffmpeg binaries
    pub fn ffmpeg(config: AssemblerConfig) -> Self {
        let toolkit = Arc::new(FfmpegToolkit::new(&config));
        Self::new(config, toolkit.clone(), toolkit)
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Assemble `paths` into `output`
    ///
    /// Fails with [`AssemblyError::EmptyInput`] before touching anything when
    /// `paths` is empty. Probe and encode failures are fatal for the batch.
    pub async fn assemble<P: AsRef<Path>>(&self, paths: &[PathBuf], output: P) -> Result<EncodedVideo> {
        let output = output.as_ref();
        let first = paths.first().ok_or(AssemblyError::EmptyInput)?;

        let _guard = self.locks.acquire(output).await;

        info!("🎞️ Assembling {} clip(s) into {:?}", paths.len(), output);

        // Step 1: Probe
        let geometry = self.prober.probe(first).await?;
        info!("   Target geometry: {} (from {:?})", geometry, first);

        // Steps 2-3: Normalize and concatenate
        let plan = AssemblyPlan::new(
            paths.to_vec(),
            geometry,
            &self.config.video_codec,
            &self.config.pixel_format,
        );
        debug!("Assembly plan: {:?}", plan);

        // Step 4: Encode into a sibling temp file, then swap it in
        let staging = staging_path(output)?;
        self.encoder.encode(&plan, &staging).await?;
        match_output_permissions(&staging, output)?;
        staging.persist(output).map_err(|e| e.error)?;

        let file_size = tokio::fs::metadata(output).await?.len();

        info!("   ✅ Output written: {:?} ({:.1} MB)", output, file_size as f64 / 1024.0 / 1024.0);

        Ok(EncodedVideo {
            path: output.to_path_buf(),
            geometry,
            clip_count: plan.clip_count(),
            file_size,
        })
    }
}

/// Empty temp file beside `output` with the same extension
///
/// ffmpeg picks the container from the extension, and renaming within one
/// directory stays on one filesystem.
fn staging_path(output: &Path) -> Result<tempfile::TempPath> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let suffix = output
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let file = tempfile::Builder::new()
        .prefix(".gloss-stitch-")
        .suffix(&suffix)
        .tempfile_in(dir)?;
    Ok(file.into_temp_path())
}

/// Give the staged file the mode the output has (or 0644 for a new output)
///
/// The staging file is created owner-only and the rename carries its mode
/// over to the output.
#[cfg(unix)]
fn match_output_permissions(staging: &Path, output: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let permissions = std::fs::metadata(output)
        .map(|meta| meta.permissions())
        .unwrap_or_else(|_| std::fs::Permissions::from_mode(0o644));
    std::fs::set_permissions(staging, permissions)?;
    Ok(())
}

#[cfg(not(unix))]
fn match_output_permissions(_staging: &Path, _output: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GlossError;
    use crate::video::types::ClipGeometry;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::tempdir;

    /// Returns a fixed geometry per clip and counts calls
    #[derive(Default)]
    struct FakeProber {
        sizes: HashMap<PathBuf, ClipGeometry>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Prober for FakeProber {
        async fn probe(&self, path: &Path) -> Result<ClipGeometry> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.sizes.get(path).copied().ok_or_else(|| {
                AssemblyError::ProbeFailed {
                    path: path.display().to_string(),
                    reason: "corrupt".to_string(),
                }
                .into()
            })
        }
    }

    /// Records plans and writes one line per clip
    #[derive(Default)]
    struct FakeEncoder {
        plans: Mutex<Vec<AssemblyPlan>>,
        fail: bool,
        delay: Option<Duration>,
        active: AtomicUsize,
        max_active: AtomicUsize,
    }

    #[async_trait]
    impl Encoder for FakeEncoder {
        async fn encode(&self, plan: &AssemblyPlan, output: &Path) -> Result<()> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.active.fetch_sub(1, Ordering::SeqCst);

            self.plans.lock().unwrap().push(plan.clone());
            if self.fail {
                return Err(AssemblyError::EncodeFailed { reason: "disk full".to_string() }.into());
            }

            let body: String = plan
                .inputs
                .iter()
                .map(|p| format!("{} {}\n", p.display(), plan.geometry))
                .collect();
            tokio::fs::write(output, body).await?;
            Ok(())
        }
    }

    fn geometry(w: u32, h: u32) -> ClipGeometry {
        ClipGeometry::new(w, h).unwrap()
    }

    fn clips() -> (Vec<PathBuf>, FakeProber) {
        let paths = vec![
            PathBuf::from("clips/hello.mp4"),
            PathBuf::from("clips/thankyou.mp4"),
            PathBuf::from("clips/bye.mp4"),
        ];
        let prober = FakeProber {
            sizes: HashMap::from([
                (paths[0].clone(), geometry(640, 480)),
                (paths[1].clone(), geometry(1920, 1080)),
                (paths[2].clone(), geometry(320, 240)),
            ]),
            ..Default::default()
        };
        (paths, prober)
    }

    #[tokio::test]
    async fn test_empty_input() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("output.mp4");
        let prober = Arc::new(FakeProber::default());
        let encoder = Arc::new(FakeEncoder::default());
        let assembler = ClipAssembler::new(AssemblerConfig::default(), prober.clone(), encoder.clone());

        let err = assembler.assemble(&[], &output).await.unwrap_err();
        assert!(err.is_nothing_to_assemble());
        assert!(!output.exists());
        assert_eq!(prober.calls.load(Ordering::SeqCst), 0);
        assert!(encoder.plans.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_geometry_follows_first_clip() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("output.mp4");
        let (paths, prober) = clips();
        let prober = Arc::new(prober);
        let encoder = Arc::new(FakeEncoder::default());
        let assembler = ClipAssembler::new(AssemblerConfig::default(), prober.clone(), encoder.clone());

        let video = assembler.assemble(&paths, &output).await.unwrap();

        assert_eq!(video.geometry, geometry(640, 480));
        assert_eq!(video.clip_count, 3);
        assert_eq!(video.path, output);
        assert!(video.file_size > 0);
        // Only the first clip is probed
        assert_eq!(prober.calls.load(Ordering::SeqCst), 1);

        let plans = encoder.plans.lock().unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].inputs, paths);
        assert_eq!(plans[0].video_codec, "libx264");
        assert_eq!(plans[0].pixel_format, "yuv420p");

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written.lines().count(), 3);
        assert!(written.lines().all(|l| l.ends_with("640x480")));
    }

    #[tokio::test]
    async fn test_existing_output_is_overwritten() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("output.mp4");
        std::fs::write(&output, "stale").unwrap();

        let (paths, prober) = clips();
        let assembler = ClipAssembler::new(
            AssemblerConfig::default(),
            Arc::new(prober),
            Arc::new(FakeEncoder::default()),
        );

        assembler.assemble(&paths[..1], &output).await.unwrap();
        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.starts_with("clips/hello.mp4"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_output_keeps_its_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let (paths, prober) = clips();
        let assembler = ClipAssembler::new(
            AssemblerConfig::default(),
            Arc::new(prober),
            Arc::new(FakeEncoder::default()),
        );
        let mode = |path: &Path| std::fs::metadata(path).unwrap().permissions().mode() & 0o777;

        let existing = dir.path().join("existing.mp4");
        std::fs::write(&existing, "stale").unwrap();
        std::fs::set_permissions(&existing, std::fs::Permissions::from_mode(0o644)).unwrap();
        assembler.assemble(&paths, &existing).await.unwrap();
        assert_eq!(mode(&existing), 0o644);

        std::fs::set_permissions(&existing, std::fs::Permissions::from_mode(0o640)).unwrap();
        assembler.assemble(&paths, &existing).await.unwrap();
        assert_eq!(mode(&existing), 0o640);

        let fresh = dir.path().join("fresh.mp4");
        assembler.assemble(&paths, &fresh).await.unwrap();
        assert_eq!(mode(&fresh), 0o644);
    }

    #[tokio::test]
    async fn test_probe_failure_is_fatal() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("output.mp4");
        let encoder = Arc::new(FakeEncoder::default());
        let assembler = ClipAssembler::new(
            AssemblerConfig::default(),
            Arc::new(FakeProber::default()),
            encoder.clone(),
        );

        let err = assembler
            .assemble(&[PathBuf::from("clips/broken.mp4")], &output)
            .await
            .unwrap_err();
        assert!(matches!(err, GlossError::Assembly(AssemblyError::ProbeFailed { .. })));
        assert!(encoder.plans.lock().unwrap().is_empty());
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_encode_failure_leaves_no_output() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("output.mp4");
        let (paths, prober) = clips();
        let encoder = FakeEncoder { fail: true, ..Default::default() };
        let assembler = ClipAssembler::new(AssemblerConfig::default(), Arc::new(prober), Arc::new(encoder));

        let err = assembler.assemble(&paths, &output).await.unwrap_err();
        assert!(matches!(err, GlossError::Assembly(AssemblyError::EncodeFailed { .. })));
        assert!(!output.exists());
        // Staging file is cleaned up as well
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_same_output_is_serialized() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("shared.mp4");
        let (paths, prober) = clips();
        let encoder = Arc::new(FakeEncoder {
            delay: Some(Duration::from_millis(30)),
            ..Default::default()
        });
        let assembler = ClipAssembler::new(AssemblerConfig::default(), Arc::new(prober), encoder.clone());
        let other = assembler.clone();

        let (a, b) = tokio::join!(
            assembler.assemble(&paths, &output),
            other.assemble(&paths[1..], &output),
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(encoder.max_active.load(Ordering::SeqCst), 1);
        assert_eq!(encoder.plans.lock().unwrap().len(), 2);
    }
}
