//! `codequill research` — Search the web, then answer using the results.

use crate::commands::{build_assistant, render_response};

pub async fn run(query: &str, model: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let assistant = build_assistant(model)?;

    eprint!("  Researching...");
    let response = assistant.research(query).await;
    eprint!("\r                 \r");

    println!("{}", render_response(&response));
    Ok(())
}
