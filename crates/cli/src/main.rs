//! Kabsh CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! kabsh migrate
//!
//! # Add a secondary admin
//! kabsh admin add -e admin@example.com
//!
//! # List admins (bootstrap admin first)
//! kabsh admin list
//!
//! # Load the sample catalogue into an empty database
//! kabsh seed
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `admin add` / `admin list` - Manage admins
//! - `seed` - Seed the catalogue with sample sheep

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "kabsh")]
#[command(author, version, about = "Kabsh CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admins
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed the catalogue with sample sheep
    Seed {
        /// Insert even if the catalogue already has listings
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Add a secondary admin
    Add {
        /// Admin email address
        #[arg(short, long)]
        email: String,
    },
    /// List admins
    List,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Add { email } => commands::admin::add(&email).await?,
            AdminAction::List => commands::admin::list().await?,
        },
        Commands::Seed { force } => commands::seed::run(force).await?,
    }
    Ok(())
}
