//! Database migration command.
//!
//! Migrations are embedded from `crates/api/migrations/` at build time and are
//! never run by the server on startup.

use kabsh_api::db::MIGRATOR;

use super::{CommandError, connect};

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let (_, store) = connect().await?;

    tracing::info!("Running migrations...");
    MIGRATOR.run(store.pool()).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
