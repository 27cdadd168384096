//! `codequill video` — Answer a question about a video's first frame.

use crate::commands::{build_assistant, render_response};
use codequill_media::VideoSource;
use std::path::Path;

pub async fn run(
    path: &Path,
    question: &str,
    model: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("No such file: {}", path.display()).into());
    }

    // Frame extraction needs an ffmpeg binary on hand.
    codequill_media::ensure_ffmpeg()?;

    let assistant = build_assistant(model)?;

    eprint!("  Thinking...");
    let response = assistant
        .process_video(VideoSource::File(path.to_path_buf()), question)
        .await;
    eprint!("\r              \r");

    println!("{}", render_response(&response));
    Ok(())
}
