//! Video frame sampling.
//!
//! Thumbnails for video assets come from the frame visible at a fixed
//! offset into playback. Decoding is delegated to a [`FrameSource`] so the
//! upload pipeline stays decoder-agnostic; the production implementation
//! shells out to the system `ffmpeg` binary and reads one MJPEG frame from
//! its stdout. A source shorter than the requested offset is an explicit
//! [`FrameError::ShortSource`] — never a silently thumbnailed black frame.

use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Playback offset of the frame used for video thumbnails.
pub const FRAME_OFFSET: Duration = Duration::from_secs(1);

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("frame decoding failed: {0}")]
    Decoder(String),
    #[error("{0} is shorter than the sampling offset")]
    ShortSource(PathBuf),
}

/// Samples one decoded frame from a video file.
// async fn in trait: the client is single-threaded (current-thread runtime),
// so the futures never need Send bounds.
#[allow(async_fn_in_trait)]
pub trait FrameSource {
    /// Decode the frame visible at `offset` of playback.
    async fn frame_at(&self, path: &Path, offset: Duration) -> Result<DynamicImage, FrameError>;
}

/// Production frame source: one `ffmpeg` invocation per sampled frame.
pub struct FfmpegFrameSource {
    bin: String,
}

impl FfmpegFrameSource {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }
}

impl Default for FfmpegFrameSource {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FrameSource for FfmpegFrameSource {
    async fn frame_at(&self, path: &Path, offset: Duration) -> Result<DynamicImage, FrameError> {
        let output = Command::new(&self.bin)
            .args(["-hide_banner", "-loglevel", "error"])
            .arg("-ss")
            .arg(format!("{}", offset.as_secs_f64()))
            .arg("-i")
            .arg(path)
            .args(["-frames:v", "1", "-f", "image2pipe", "-c:v", "mjpeg", "pipe:1"])
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FrameError::Decoder(stderr.trim().to_string()));
        }
        // ffmpeg exits 0 with empty output when the seek lands past the end
        if output.stdout.is_empty() {
            return Err(FrameError::ShortSource(path.to_path_buf()));
        }

        image::load_from_memory(&output.stdout).map_err(|e| FrameError::Decoder(e.to_string()))
    }
}
