//! User profile rows.

use chrono::{DateTime, Utc};
use kabsh_core::models::UserProfile;
use kabsh_core::validation::NewUserProfile;
use kabsh_core::{Email, UserType};

use super::PgStore;
use crate::store::{RepositoryError, UserStore};

const USER_COLUMNS: &str = "uid, email, display_name, photo_url, user_type, created_at, updated_at";

/// Internal row type for `PostgreSQL` user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    uid: String,
    email: Option<String>,
    display_name: Option<String>,
    photo_url: Option<String>,
    user_type: UserType,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserProfile {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = row
            .email
            .as_deref()
            .map(Email::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
            })?;

        Ok(Self {
            uid: row.uid,
            email,
            display_name: row.display_name,
            photo_url: row.photo_url,
            user_type: row.user_type,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl UserStore for PgStore {
    async fn get_user(&self, uid: &str) -> Result<Option<UserProfile>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE uid = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(uid)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn upsert_user(&self, profile: NewUserProfile) -> Result<UserProfile, RepositoryError> {
        let sql = format!(
            "INSERT INTO users (uid, email, display_name, photo_url, user_type) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (uid) DO UPDATE SET \
                 email = EXCLUDED.email, \
                 display_name = EXCLUDED.display_name, \
                 photo_url = EXCLUDED.photo_url, \
                 user_type = EXCLUDED.user_type, \
                 updated_at = NOW() \
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(profile.uid)
            .bind(profile.email.map(Email::into_inner))
            .bind(profile.display_name)
            .bind(profile.photo_url)
            .bind(profile.user_type)
            .fetch_one(&self.pool)
            .await?;

        row.try_into()
    }
}
