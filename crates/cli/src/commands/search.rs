//! `codequill search` — Run a web search.

use crate::commands::{build_assistant, render_results};

pub async fn run(query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let assistant = build_assistant(None)?;

    eprint!("  Searching...");
    let results = assistant.search(query).await;
    eprint!("\r               \r");

    println!("{}", render_results(&results));
    Ok(())
}
