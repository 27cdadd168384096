//! CodeQuill CLI — the main entry point.
//!
//! Commands:
//! - `onboard`  — Initialize config
//! - `ask`      — Answer a free-text question
//! - `image`    — Answer a question about an image file
//! - `video`    — Answer a question about a video file
//! - `search`   — Run a web search
//! - `research` — Search the web, then answer using the results
//! - `models`   — List the model catalog

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "codequill",
    about = "CodeQuill — multimodal AI coding assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Override the model for this invocation
    #[arg(short, long, global = true)]
    model: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Onboard,

    /// Answer a free-text question
    Ask {
        /// The question to send
        prompt: String,
    },

    /// Answer a question about an image file
    Image {
        /// Path to the image (png, jpeg, gif, bmp, webp)
        path: PathBuf,

        /// Question about the image
        #[arg(short, long, default_value = "")]
        question: String,
    },

    /// Answer a question about a video file (its first frame)
    Video {
        /// Path to the video
        path: PathBuf,

        /// Question about the video
        #[arg(short, long, default_value = "")]
        question: String,
    },

    /// Run a web search
    Search {
        /// The search query
        query: String,
    },

    /// Search the web, then answer using the results
    Research {
        /// The query to research
        query: String,
    },

    /// List the model catalog
    Models,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Ask { prompt } => commands::ask::run(&prompt, cli.model.as_deref()).await?,
        Commands::Image { path, question } => {
            commands::image::run(&path, &question, cli.model.as_deref()).await?
        }
        Commands::Video { path, question } => {
            commands::video::run(&path, &question, cli.model.as_deref()).await?
        }
        Commands::Search { query } => commands::search::run(&query).await?,
        Commands::Research { query } => {
            commands::research::run(&query, cli.model.as_deref()).await?
        }
        Commands::Models => commands::models::run(cli.model.as_deref()).await?,
    }

    Ok(())
}
