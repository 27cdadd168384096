//! Subcommand implementations.

pub mod ask;
pub mod image;
pub mod models;
pub mod onboard;
pub mod research;
pub mod search;
pub mod video;

use codequill_assistant::Assistant;
use codequill_config::AppConfig;
use codequill_core::model::ModelId;
use codequill_core::response::{GatewayResponse, Outcome};
use codequill_core::search::SearchResult;

/// Load configuration and build the assistant, applying a per-invocation
/// model override if one was given.
pub fn build_assistant(model: Option<&str>) -> Result<Assistant, Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    OPENROUTER_API_KEY = 'sk-or-v1-...'   (recommended)");
        eprintln!("    CODEQUILL_API_KEY  = 'sk-...'         (generic)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        eprintln!("  Get an OpenRouter key at: https://openrouter.ai/keys");
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let assistant = Assistant::from_config(&config)?;

    if let Some(id) = model {
        assistant
            .set_model(&ModelId::new(id))
            .map_err(|e| format!("{e}. Run `codequill models` to see the catalog."))?;
    }

    Ok(assistant)
}

/// Render a gateway response for the terminal.
pub fn render_response(response: &GatewayResponse) -> String {
    match &response.outcome {
        Outcome::Success { content } => {
            format!("[{}]\n\n{}", response.model, content)
        }
        Outcome::Failure { kind, detail } => {
            format!("[{}] request failed ({kind}): {detail}", response.model)
        }
    }
}

/// Render a search result list for the terminal.
pub fn render_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "  No results found.".into();
    }

    let mut out = String::new();
    for (i, hit) in results.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("  {}. {}\n", i + 1, hit.title));
        if !hit.snippet.is_empty() {
            out.push_str(&format!("     {}\n", hit.snippet));
        }
        if !hit.link.is_empty() {
            out.push_str(&format!("     {}\n", hit.link));
        }
    }
    out
}
