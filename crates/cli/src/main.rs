//! Storecart CLI - Session table migration and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the session table used to persist carts
//! storecart-cli migrate
//!
//! # Validate a catalog file (defaults to the bundled catalog)
//! storecart-cli catalog check path/to/items.json
//!
//! # Print the products in a catalog
//! storecart-cli catalog list
//! ```
//!
//! # Commands
//!
//! - `migrate` - Create the tower-sessions table in the storefront database
//! - `catalog check` - Load and validate a catalog
//! - `catalog list` - List a catalog's products

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "storecart-cli")]
#[command(author, version, about = "Storecart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the session table that stores visitor carts
    Migrate,
    /// Inspect a product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Load a catalog and report whether it is valid
    Check {
        /// Catalog JSON file (bundled catalog when omitted)
        path: Option<PathBuf>,
    },
    /// Print every product in a catalog
    List {
        /// Catalog JSON file (bundled catalog when omitted)
        path: Option<PathBuf>,
    },
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
        Commands::Migrate => commands::migrate::sessions().await?,
        Commands::Catalog { action } => match action {
            CatalogAction::Check { path } => commands::catalog::check(path.as_deref())?,
            CatalogAction::List { path } => commands::catalog::list(path.as_deref())?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_catalog_path_is_optional() {
        let cli = Cli::try_parse_from(["storecart-cli", "catalog", "list"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Catalog {
                action: CatalogAction::List { path: None }
            })
        ));
    }
}
