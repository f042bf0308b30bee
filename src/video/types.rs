use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Frame size every clip in a batch is scaled to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipGeometry {
    pub width: u32,
    pub height: u32,
}

impl ClipGeometry {
    /// `None` unless both dimensions are positive
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            None
        } else {
            Some(Self { width, height })
        }
    }
}

impl fmt::Display for ClipGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Everything the encoder needs to normalize, join and encode one batch
///
/// Inputs are scaled to `geometry` (aspect ratio is not preserved), joined
/// video-only in input order, then encoded with `video_codec`/`pixel_format`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyPlan {
    pub inputs: Vec<PathBuf>,
    pub geometry: ClipGeometry,
    pub video_codec: String,
    pub pixel_format: String,
}

impl AssemblyPlan {
    pub fn new(
        inputs: Vec<PathBuf>,
        geometry: ClipGeometry,
        video_codec: impl Into<String>,
        pixel_format: impl Into<String>,
    ) -> Self {
        Self {
            inputs,
            geometry,
            video_codec: video_codec.into(),
            pixel_format: pixel_format.into(),
        }
    }

    pub fn clip_count(&self) -> usize {
        self.inputs.len()
    }

    /// ffmpeg filter graph: one scale per input feeding a video-only concat
    pub fn filter_complex(&self) -> String {
        let ClipGeometry { width, height } = self.geometry;
        let mut graph = String::new();

        for i in 0..self.inputs.len() {
            graph.push_str(&format!("[{i}:v]scale={width}:{height},setsar=1[v{i}];"));
        }
        for i in 0..self.inputs.len() {
            graph.push_str(&format!("[v{i}]"));
        }
        graph.push_str(&format!("concat=n={}:v=1:a=0[outv]", self.inputs.len()));
        graph
    }

    /// Full ffmpeg argument list writing to `output`, overwriting it
    pub fn ffmpeg_args(&self, output: &Path) -> Vec<String> {
        let mut args: Vec<String> = ["-hide_banner", "-loglevel", "error", "-y"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        for input in &self.inputs {
            args.push("-i".to_string());
            args.push(input.display().to_string());
        }

        args.extend([
            "-filter_complex".to_string(),
            self.filter_complex(),
            "-map".to_string(),
            "[outv]".to_string(),
            "-an".to_string(),
            "-c:v".to_string(),
            self.video_codec.clone(),
            "-pix_fmt".to_string(),
            self.pixel_format.clone(),
            output.display().to_string(),
        ]);
        args
    }
}

/// Result of a successful assembly
#[derive(Debug, Clone)]
pub struct EncodedVideo {
    pub path: PathBuf,
    pub geometry: ClipGeometry,
    pub clip_count: usize,
    pub file_size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(n: usize) -> AssemblyPlan {
        let inputs = (0..n).map(|i| PathBuf::from(format!("clips/{i}.mp4"))).collect();
        AssemblyPlan::new(inputs, ClipGeometry::new(640, 480).unwrap(), "libx264", "yuv420p")
    }

    #[test]
    fn test_geometry_requires_positive_dimensions() {
        assert!(ClipGeometry::new(0, 480).is_none());
        assert!(ClipGeometry::new(640, 0).is_none());
        assert_eq!(ClipGeometry::new(640, 480).unwrap().to_string(), "640x480");
    }

    #[test]
    fn test_filter_complex_scales_every_input() {
        assert_eq!(
            plan(2).filter_complex(),
            "[0:v]scale=640:480,setsar=1[v0];[1:v]scale=640:480,setsar=1[v1];\
             [v0][v1]concat=n=2:v=1:a=0[outv]"
        );
        assert_eq!(
            plan(1).filter_complex(),
            "[0:v]scale=640:480,setsar=1[v0];[v0]concat=n=1:v=1:a=0[outv]"
        );
    }

    #[test]
    fn test_ffmpeg_args_layout() {
        let args = plan(2).ffmpeg_args(Path::new("out/final.mp4"));

        assert_eq!(args.iter().filter(|a| *a == "-i").count(), 2);
        assert!(args.contains(&"-y".to_string()));
        assert!(args.contains(&"-an".to_string()));

        let codec = args.iter().position(|a| a == "-c:v").unwrap();
        assert_eq!(args[codec + 1], "libx264");
        let pix = args.iter().position(|a| a == "-pix_fmt").unwrap();
        assert_eq!(args[pix + 1], "yuv420p");
        assert_eq!(args.last().unwrap(), "out/final.mp4");
    }
}
