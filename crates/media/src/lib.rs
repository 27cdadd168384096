//! Input normalization for CodeQuill.
//!
//! Converts every supported input kind — free text, a still image, a
//! video source — into one [`Prompt`]. Images are forced into a canonical
//! form (RGB8, JPEG, base64) regardless of what they arrived as; videos
//! are reduced to their first decodable frame and then follow the image
//! path. The original input bytes are never retained past the call.

mod video;

pub use video::ensure_ffmpeg;

use codequill_core::error::MediaError;
use codequill_core::prompt::{ImagePayload, Prompt};
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::path::PathBuf;
use tracing::debug;

/// A video input. The caller decides how the video is sourced; this crate
/// only extracts one representative frame.
#[derive(Debug, Clone)]
pub enum VideoSource {
    /// A container file on disk; frame extraction is delegated to ffmpeg.
    File(PathBuf),
    /// Pre-decoded frame byte buffers (each one an encoded image).
    Frames(Vec<Vec<u8>>),
}

/// Wrap free text as a prompt. No image payload.
pub fn from_text(text: impl Into<String>) -> Prompt {
    Prompt::text(text)
}

/// Normalize encoded image bytes: decode, force RGB8, re-encode as JPEG,
/// and embed base64 alongside the question text.
pub fn from_image(bytes: &[u8], question: &str) -> Result<Prompt, MediaError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| MediaError::ImageDecode(e.to_string()))?;
    prompt_from_decoded(decoded, question)
}

/// Normalize a video source: extract the first decodable frame, then
/// follow the image path. A source with zero decodable frames is a
/// [`MediaError::VideoRead`], never a generic failure.
pub async fn from_video(source: VideoSource, question: &str) -> Result<Prompt, MediaError> {
    match source {
        VideoSource::File(path) => {
            debug!(path = %path.display(), "Extracting first video frame");
            let frame = tokio::task::spawn_blocking(move || video::first_frame_from_file(&path))
                .await
                .map_err(|e| MediaError::VideoRead(format!("frame extraction panicked: {e}")))??;
            prompt_from_decoded(DynamicImage::ImageRgb8(frame), question)
        }
        VideoSource::Frames(frames) => {
            let total = frames.len();
            for bytes in &frames {
                if let Ok(decoded) = image::load_from_memory(bytes) {
                    return prompt_from_decoded(decoded, question);
                }
            }
            Err(MediaError::VideoRead(format!(
                "no decodable frame among {total} frame buffers"
            )))
        }
    }
}

/// Canonicalize a decoded image into the prompt's embedded JPEG payload.
fn prompt_from_decoded(decoded: DynamicImage, question: &str) -> Result<Prompt, MediaError> {
    let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());

    let mut jpeg = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new(&mut jpeg))
        .map_err(|e| MediaError::ImageDecode(format!("jpeg encode failed: {e}")))?;

    Ok(Prompt::with_image(
        question,
        ImagePayload::from_jpeg_bytes(&jpeg),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([255, 0, 0]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn text_is_wrapped_verbatim() {
        let prompt = from_text("how do I fix this lifetime error?");
        assert_eq!(prompt.text, "how do I fix this lifetime error?");
        assert!(prompt.image.is_none());
    }

    #[test]
    fn image_is_reencoded_as_embedded_jpeg() {
        let prompt = from_image(&tiny_png(), "what is this?").unwrap();
        assert_eq!(prompt.text, "what is this?");

        let payload = prompt.image.expect("image payload");
        let jpeg = payload.to_jpeg_bytes();
        let format = image::guess_format(&jpeg).unwrap();
        assert_eq!(format, image::ImageFormat::Jpeg);

        let reopened = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(reopened.width(), 2);
        assert_eq!(reopened.height(), 2);
    }

    #[test]
    fn embedded_base64_round_trips_byte_identical() {
        let prompt = from_image(&tiny_png(), "q").unwrap();
        let payload = prompt.image.unwrap();

        let decoded = BASE64.decode(payload.as_base64()).unwrap();
        assert_eq!(decoded, payload.to_jpeg_bytes());
        assert_eq!(ImagePayload::from_jpeg_bytes(&decoded), payload);
    }

    #[test]
    fn normalization_is_deterministic() {
        let a = from_image(&tiny_png(), "q").unwrap();
        let b = from_image(&tiny_png(), "q").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn garbage_image_bytes_fail_with_image_decode() {
        let err = from_image(b"definitely not an image", "q").unwrap_err();
        assert!(matches!(err, MediaError::ImageDecode(_)));
    }

    #[tokio::test]
    async fn first_decodable_frame_wins() {
        let frames = vec![b"corrupt frame".to_vec(), tiny_png()];
        let prompt = from_video(VideoSource::Frames(frames), "what happens?")
            .await
            .unwrap();
        assert!(prompt.image.is_some());
        assert_eq!(prompt.text, "what happens?");
    }

    #[tokio::test]
    async fn all_corrupt_frames_fail_with_video_read() {
        let frames = vec![b"junk".to_vec(), b"more junk".to_vec()];
        let err = from_video(VideoSource::Frames(frames), "q").await.unwrap_err();
        assert!(matches!(err, MediaError::VideoRead(_)));
    }

    #[tokio::test]
    async fn empty_frame_list_fails_with_video_read() {
        let err = from_video(VideoSource::Frames(vec![]), "q").await.unwrap_err();
        assert!(matches!(err, MediaError::VideoRead(_)));
    }

    #[tokio::test]
    async fn missing_video_file_fails_with_video_read() {
        let source = VideoSource::File("/nonexistent/clip.mp4".into());
        let err = from_video(source, "q").await.unwrap_err();
        assert!(matches!(err, MediaError::VideoRead(_)));
    }
}
