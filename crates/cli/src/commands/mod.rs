//! Subcommand implementations.
//!
//! Every command reads the same environment as the API server
//! (`KABSH_DATABASE_URL`, falling back to `DATABASE_URL`).

pub mod admin;
pub mod migrate;
pub mod seed;

use kabsh_api::config::{ApiConfig, ConfigError, StoreConfig};
use kabsh_api::db::{self, PgStore};
use kabsh_api::services::AdminError;
use kabsh_api::store::RepositoryError;
use kabsh_core::validation::ValidationError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The configured store is not `PostgreSQL`.
    #[error("KABSH_STORE=memory has no database to operate on")]
    MemoryStore,

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Admin rule violated.
    #[error("{0}")]
    Admin(#[from] AdminError),

    /// Built-in sample data could not be read.
    #[error("Sample data error: {0}")]
    SampleData(#[from] serde_json::Error),

    /// Input rejected by validation.
    #[error("Invalid {}: {}", .0.field, .0.message)]
    Validation(#[from] ValidationError),
}

/// Load configuration and connect to the configured database.
async fn connect() -> Result<(ApiConfig, PgStore), CommandError> {
    let config = ApiConfig::from_env()?;
    let StoreConfig::Postgres { database_url } = &config.store else {
        return Err(CommandError::MemoryStore);
    };

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(database_url).await?;
    Ok((config, PgStore::new(pool)))
}
