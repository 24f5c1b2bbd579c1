//! Admin management commands.
//!
//! The same rules as the HTTP API apply: the bootstrap admin
//! (`KABSH_PRIMARY_ADMIN_EMAIL`) is reserved and duplicates are rejected.

use kabsh_api::services::AdminDirectory;
use kabsh_core::validation::AdminDraft;

use super::{CommandError, connect};

/// Add a secondary admin.
///
/// # Errors
///
/// Returns an error for an invalid or reserved email, a duplicate, or a
/// database failure.
pub async fn add(email: &str) -> Result<(), CommandError> {
    let admin = AdminDraft {
        email: Some(email.to_owned()),
        role: None,
    }
    .validate()?;

    let (config, store) = connect().await?;
    let directory = AdminDirectory::new(config.primary_admin_email);
    let admin = directory.add(&store, admin).await?;

    tracing::info!(
        "Admin added successfully! ID: {}, Email: {}, Role: {}",
        admin.id,
        admin.email,
        admin.role
    );
    Ok(())
}

/// List admins, bootstrap admin first.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn list() -> Result<(), CommandError> {
    let (config, store) = connect().await?;
    let directory = AdminDirectory::new(config.primary_admin_email);
    let admins = directory.list(&store).await?;

    tracing::info!("Admins ({})", admins.len());
    for admin in admins {
        match admin.id {
            Some(id) => tracing::info!("  #{id} {} ({})", admin.email, admin.role),
            None => tracing::info!("  -- {} ({}, from configuration)", admin.email, admin.role),
        }
    }
    Ok(())
}
