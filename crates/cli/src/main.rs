//! Green Wally CLI - Database migrations and catalog management.
//!
//! # Usage
//!
//! ```bash
//! # Apply storefront database migrations
//! gw-cli migrate
//!
//! # Seed the built-in catalog (idempotent by product name)
//! gw-cli seed catalog
//!
//! # Seed from a YAML file instead
//! gw-cli seed catalog --file catalog.yaml
//!
//! # List the catalog
//! gw-cli products list
//! ```
//!
//! The database is selected the same way as for the storefront
//! (`STOREFRONT_DATABASE_URL`, then `DATABASE_URL`, then `sqlite://grocery.db?mode=rwc`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gw-cli")]
#[command(author, version, about = "Green Wally Grocers CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Inspect the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert catalog products that are not already present
    Catalog {
        /// YAML file with a list of products (defaults to the built-in catalog)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List every product in id order
    List,
}

#[tokio::main]
async fn main() {
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Catalog { file } => commands::seed::catalog(file.as_deref()).await?,
        },
        Commands::Products { action } => match action {
            ProductsAction::List => commands::products::list().await?,
        },
    }
    Ok(())
}
