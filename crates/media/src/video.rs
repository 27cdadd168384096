//! First-frame extraction from container files via ffmpeg.
//!
//! ffmpeg runs as a sidecar process decoding exactly one frame to raw
//! rgb24 on stdout; the child and its pipes are dropped on every exit
//! path, success or failure.

use codequill_core::error::MediaError;
use ffmpeg_sidecar::command::FfmpegCommand;
use image::RgbImage;
use std::path::Path;
use tracing::debug;

/// Make sure an ffmpeg binary is available, downloading one if needed.
/// Intended for the collaborator layer's startup path, not per-call use.
pub fn ensure_ffmpeg() -> Result<(), MediaError> {
    ffmpeg_sidecar::download::auto_download()
        .map_err(|e| MediaError::VideoRead(format!("ffmpeg unavailable: {e}")))
}

/// Decode the first frame of `path` into an RGB image.
pub(crate) fn first_frame_from_file(path: &Path) -> Result<RgbImage, MediaError> {
    let mut command = FfmpegCommand::new();
    let mut child = command
        .hide_banner()
        .input(path.to_string_lossy().as_ref())
        .args(["-frames:v", "1"])
        .rawvideo()
        .spawn()
        .map_err(|e| MediaError::VideoRead(format!("failed to spawn ffmpeg: {e}")))?;

    let frames = child
        .iter()
        .map_err(|e| MediaError::VideoRead(format!("failed to read ffmpeg output: {e}")))?
        .filter_frames();

    for frame in frames {
        debug!(
            width = frame.width,
            height = frame.height,
            pix_fmt = %frame.pix_fmt,
            "Decoded video frame"
        );
        if let Some(img) = RgbImage::from_raw(frame.width, frame.height, frame.data) {
            return Ok(img);
        }
    }

    Err(MediaError::VideoRead(format!(
        "no decodable frame in {}",
        path.display()
    )))
}
