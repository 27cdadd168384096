//! `codequill image` — Answer a question about an image file.

use crate::commands::{build_assistant, render_response};
use std::path::Path;

pub async fn run(
    path: &Path,
    question: &str,
    model: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;

    let assistant = build_assistant(model)?;

    eprint!("  Thinking...");
    let response = assistant.process_image(&bytes, question).await;
    eprint!("\r              \r");

    println!("{}", render_response(&response));
    Ok(())
}
