//! Admin directory: the configured bootstrap admin plus stored admins.
//!
//! The bootstrap (primary) admin is never stored. It is privileged even when
//! the admins table is empty, and it cannot be added, removed or demoted
//! through the API.

use chrono::{DateTime, Utc};
use kabsh_core::models::Admin;
use kabsh_core::validation::NewAdmin;
use kabsh_core::{AdminId, AdminRole, Email};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::store::{AdminStore, RepositoryError};

/// Errors from admin management.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("هذا البريد محجوز للمدير الرئيسي")]
    ReservedEmail,

    #[error("هذا المدير موجود بالفعل")]
    AlreadyExists,

    #[error("لا يمكن حذف المدير الرئيسي")]
    PrimaryUndeletable,

    #[error("المدير غير موجود")]
    NotFound,

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for AdminError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::Conflict(_) => Self::AlreadyExists,
            other => Self::Repository(other),
        }
    }
}

/// One row of the admin list. The bootstrap admin has no id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminEntry {
    pub id: Option<AdminId>,
    pub email: Email,
    pub role: AdminRole,
    pub added_at: Option<DateTime<Utc>>,
}

impl From<Admin> for AdminEntry {
    fn from(admin: Admin) -> Self {
        Self {
            id: Some(admin.id),
            email: admin.email,
            role: admin.role,
            added_at: Some(admin.added_at),
        }
    }
}

/// Answer to "is this email an admin?".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCheck {
    pub email: Email,
    pub is_admin: bool,
    pub role: Option<AdminRole>,
}

/// Admin lookups and management.
#[derive(Debug, Clone, Default)]
pub struct AdminDirectory {
    primary: Option<Email>,
}

impl AdminDirectory {
    /// Create a directory with an optional bootstrap admin.
    #[must_use]
    pub const fn new(primary: Option<Email>) -> Self {
        Self { primary }
    }

    /// Whether `email` is the bootstrap admin.
    #[must_use]
    pub fn is_primary(&self, email: &Email) -> bool {
        self.primary.as_ref() == Some(email)
    }

    /// Role of `email`, if it is an admin.
    ///
    /// # Errors
    ///
    /// Returns error if the store lookup fails.
    pub async fn role_of<S: AdminStore>(
        &self,
        store: &S,
        email: &Email,
    ) -> Result<Option<AdminRole>, RepositoryError> {
        if self.is_primary(email) {
            return Ok(Some(AdminRole::Primary));
        }
        Ok(store.get_admin_by_email(email).await?.map(|a| a.role))
    }

    /// Check whether `email` is an admin.
    ///
    /// # Errors
    ///
    /// Returns error if the store lookup fails.
    pub async fn check<S: AdminStore>(
        &self,
        store: &S,
        email: Email,
    ) -> Result<AdminCheck, RepositoryError> {
        let role = self.role_of(store, &email).await?;
        Ok(AdminCheck {
            email,
            is_admin: role.is_some(),
            role,
        })
    }

    /// Bootstrap admin first, then stored admins oldest first.
    ///
    /// # Errors
    ///
    /// Returns error if the store lookup fails.
    pub async fn list<S: AdminStore>(&self, store: &S) -> Result<Vec<AdminEntry>, RepositoryError> {
        let stored = store.list_admins().await?;
        let mut entries = Vec::with_capacity(stored.len() + 1);
        if let Some(primary) = &self.primary {
            entries.push(AdminEntry {
                id: None,
                email: primary.clone(),
                role: AdminRole::Primary,
                added_at: None,
            });
        }
        entries.extend(
            stored
                .into_iter()
                .filter(|a| !self.is_primary(&a.email))
                .map(AdminEntry::from),
        );
        Ok(entries)
    }

    /// Store a new admin.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::ReservedEmail`] for the bootstrap email and
    /// [`AdminError::AlreadyExists`] for a duplicate.
    pub async fn add<S: AdminStore>(&self, store: &S, admin: NewAdmin) -> Result<Admin, AdminError> {
        if self.is_primary(&admin.email) {
            return Err(AdminError::ReservedEmail);
        }
        if store.get_admin_by_email(&admin.email).await?.is_some() {
            return Err(AdminError::AlreadyExists);
        }
        let admin = store.create_admin(admin).await?;
        info!(admin_id = %admin.id, email = %admin.email, "Admin added");
        Ok(admin)
    }

    /// Remove a stored admin.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotFound`] for an unknown id and
    /// [`AdminError::PrimaryUndeletable`] for a row holding the bootstrap email.
    pub async fn remove<S: AdminStore>(&self, store: &S, id: AdminId) -> Result<(), AdminError> {
        let admin = store.get_admin(id).await?.ok_or(AdminError::NotFound)?;
        if self.is_primary(&admin.email) || admin.role == AdminRole::Primary {
            return Err(AdminError::PrimaryUndeletable);
        }
        store.delete_admin(id).await?;
        info!(admin_id = %id, "Admin removed");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use kabsh_core::validation::AdminDraft;

    use super::*;
    use crate::store::MemoryStore;

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    fn new_admin(s: &str) -> NewAdmin {
        AdminDraft {
            email: Some(s.to_owned()),
            role: None,
        }
        .validate()
        .unwrap()
    }

    fn directory() -> AdminDirectory {
        AdminDirectory::new(Some(email("owner@kabsh.dz")))
    }

    #[tokio::test]
    async fn test_bootstrap_admin_with_empty_table() {
        let check = directory()
            .check(&MemoryStore::new(), email("OWNER@kabsh.dz"))
            .await
            .unwrap();
        assert!(check.is_admin);
        assert_eq!(check.role, Some(AdminRole::Primary));
    }

    #[tokio::test]
    async fn test_unknown_email_is_not_admin() {
        let check = directory()
            .check(&MemoryStore::new(), email("guest@mail.dz"))
            .await
            .unwrap();
        assert!(!check.is_admin);
        assert_eq!(check.role, None);
    }

    #[tokio::test]
    async fn test_list_puts_bootstrap_first() {
        let store = MemoryStore::new();
        let dir = directory();
        dir.add(&store, new_admin("helper@kabsh.dz")).await.unwrap();

        let list = dir.list(&store).await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, None);
        assert_eq!(list[0].role, AdminRole::Primary);
        assert_eq!(list[1].email.as_str(), "helper@kabsh.dz");
    }

    #[tokio::test]
    async fn test_add_rejects_reserved_and_duplicate() {
        let store = MemoryStore::new();
        let dir = directory();
        assert!(matches!(
            dir.add(&store, new_admin("owner@kabsh.dz")).await,
            Err(AdminError::ReservedEmail)
        ));
        dir.add(&store, new_admin("helper@kabsh.dz")).await.unwrap();
        let err = dir.add(&store, new_admin("Helper@Kabsh.dz")).await.unwrap_err();
        assert!(matches!(err, AdminError::AlreadyExists));
        assert_eq!(err.to_string(), "هذا المدير موجود بالفعل");
    }

    #[tokio::test]
    async fn test_remove() {
        let store = MemoryStore::new();
        let dir = directory();
        let admin = dir.add(&store, new_admin("helper@kabsh.dz")).await.unwrap();
        dir.remove(&store, admin.id).await.unwrap();
        assert!(matches!(
            dir.remove(&store, admin.id).await,
            Err(AdminError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_stored_row_with_bootstrap_email_is_protected() {
        let store = MemoryStore::new();
        let stored = store.create_admin(new_admin("owner@kabsh.dz")).await.unwrap();
        let dir = directory();
        assert!(matches!(
            dir.remove(&store, stored.id).await,
            Err(AdminError::PrimaryUndeletable)
        ));
        // Not listed twice.
        assert_eq!(dir.list(&store).await.unwrap().len(), 1);
    }
}
