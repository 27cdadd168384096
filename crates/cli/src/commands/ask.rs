//! `codequill ask` — Answer a free-text question.

use crate::commands::{build_assistant, render_response};

pub async fn run(prompt: &str, model: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let assistant = build_assistant(model)?;

    eprint!("  Thinking...");
    let response = assistant.process_text(prompt).await;
    eprint!("\r              \r");

    println!("{}", render_response(&response));
    Ok(())
}
