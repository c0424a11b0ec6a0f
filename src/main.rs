//! Note Graph - command line entry point
//!
//! `ingest` builds the similarity graph from a note vault;
//! `weak-cards` prints the flashcards the review service flags as weak.

use anyhow::Result;
use clap::{Parser, Subcommand};
use note_graph::{review, AppState, Config};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "note-graph")]
#[command(about = "Build a Neo4j similarity graph from a note vault")]
struct Cli {
    /// Path to a YAML config file (default: ./config.yaml if present)
    #[arg(long, global = true, env = "NOTE_GRAPH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract notes, resolve relationships and write them to Neo4j
    Ingest {
        /// Vault directory (overrides vault.path from config)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Print weak flashcards from the review service
    WeakCards,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,note_graph=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_yaml_and_env(cli.config.as_deref())?;

    match cli.command {
        Commands::Ingest { path } => run_ingest(config, path).await,
        Commands::WeakCards => run_weak_cards(config).await,
    }
}

async fn run_ingest(config: Config, path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(|| PathBuf::from(&config.vault_path));

    let state = AppState::new(config).await?;
    tracing::info!("Connected to Neo4j");

    let orchestrator = state.orchestrator()?;
    match orchestrator.run(&path).await {
        Ok(report) => {
            tracing::info!(
                "Ingest complete: {} notes, {} relationships in {} batches",
                report.notes,
                report.relationships,
                report.persisted.batches
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(stage = e.stage(), "Ingest failed: {}", e);
            Err(e.into())
        }
    }
}

async fn run_weak_cards(config: Config) -> Result<()> {
    let client = note_graph::review_client(&config)?;
    let cards = client.weak_cards().await?;
    if cards.is_empty() {
        println!("No weak cards.");
        return Ok(());
    }
    print!("{}", review::render_cards(&cards));
    Ok(())
}
