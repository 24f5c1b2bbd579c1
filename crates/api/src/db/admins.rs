//! Admin rows.

use chrono::{DateTime, Utc};
use kabsh_core::models::Admin;
use kabsh_core::validation::NewAdmin;
use kabsh_core::{AdminId, AdminRole, Email};

use super::{PgStore, conflict_or_database, expect_one};
use crate::store::{AdminStore, RepositoryError};

/// Internal row type for `PostgreSQL` admin queries.
#[derive(Debug, sqlx::FromRow)]
struct AdminRow {
    id: i32,
    email: String,
    role: AdminRole,
    added_at: DateTime<Utc>,
}

impl TryFrom<AdminRow> for Admin {
    type Error = RepositoryError;

    fn try_from(row: AdminRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: AdminId::new(row.id),
            email,
            role: row.role,
            added_at: row.added_at,
        })
    }
}

impl AdminStore for PgStore {
    async fn list_admins(&self) -> Result<Vec<Admin>, RepositoryError> {
        let rows = sqlx::query_as::<_, AdminRow>(
            "SELECT id, email, role, added_at FROM admins ORDER BY added_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn get_admin(&self, id: AdminId) -> Result<Option<Admin>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>(
            "SELECT id, email, role, added_at FROM admins WHERE id = $1",
        )
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn get_admin_by_email(&self, email: &Email) -> Result<Option<Admin>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>(
            "SELECT id, email, role, added_at FROM admins WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn create_admin(&self, admin: NewAdmin) -> Result<Admin, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>(
            "INSERT INTO admins (email, role) VALUES ($1, $2) \
             RETURNING id, email, role, added_at",
        )
        .bind(admin.email.as_str())
        .bind(admin.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "admin email"))?;

        row.try_into()
    }

    async fn delete_admin(&self, id: AdminId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM admins WHERE id = $1")
            .bind(id.as_i32())
            .execute(&self.pool)
            .await?;

        expect_one(result.rows_affected())
    }
}
