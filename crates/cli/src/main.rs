//! Kilnworks CLI - Catalog import and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Import the product catalog from the configured feed
//! kw-cli import products
//! ```
//!
//! # Commands
//!
//! - `import products` - Paginate the external feed, re-host images, and
//!   upsert product documents into the content store

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "kw-cli")]
#[command(author, version, about = "Kilnworks CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import data into the content store
    Import {
        #[command(subcommand)]
        target: ImportTarget,
    },
}

#[derive(Subcommand)]
enum ImportTarget {
    /// Import the product catalog from the external feed
    Products,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Import { target } => match target {
            ImportTarget::Products => commands::import::products().await?,
        },
    }
    Ok(())
}
