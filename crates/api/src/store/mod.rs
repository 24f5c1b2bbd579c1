//! Persistence port.
//!
//! Handlers are written against these traits; the adapter is picked at
//! startup from configuration:
//!
//! - [`MemoryStore`] - in-process maps, for development and tests
//! - [`PgStore`](crate::db::PgStore) - `PostgreSQL` via `sqlx`
//!
//! Every `create_*` assigns the id and timestamps. Updates re-stamp
//! `updated_at`. Updates and deletes of an unknown id fail with
//! [`RepositoryError::NotFound`].

mod memory;

use kabsh_core::models::{Admin, Image, NewImage, Order, Sheep, UserProfile};
use kabsh_core::validation::{NewAdmin, NewOrder, NewSheep, NewUserProfile, OrderUpdate};
use kabsh_core::{AdminId, Email, ImageId, OrderId, OrderStatus, SheepId};
use thiserror::Error;

pub use memory::MemoryStore;

/// Errors that can occur in repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Sheep listings.
pub trait SheepStore: Clone + Send + Sync + 'static {
    /// All listings, newest first.
    fn list_sheep(&self) -> impl Future<Output = Result<Vec<Sheep>, RepositoryError>> + Send;

    /// A single listing.
    fn get_sheep(
        &self,
        id: SheepId,
    ) -> impl Future<Output = Result<Option<Sheep>, RepositoryError>> + Send;

    /// Insert a listing.
    fn create_sheep(
        &self,
        sheep: NewSheep,
    ) -> impl Future<Output = Result<Sheep, RepositoryError>> + Send;

    /// Insert `images` and a listing that references them, all or nothing.
    ///
    /// The new image ids are appended after the references already in
    /// `sheep.image_ids`.
    fn create_sheep_with_images(
        &self,
        sheep: NewSheep,
        images: Vec<NewImage>,
    ) -> impl Future<Output = Result<(Sheep, Vec<Image>), RepositoryError>> + Send;

    /// Replace every field of a listing.
    fn update_sheep(
        &self,
        id: SheepId,
        sheep: NewSheep,
    ) -> impl Future<Output = Result<Sheep, RepositoryError>> + Send;

    /// Hard-delete a listing. Orders keep their snapshot.
    fn delete_sheep(&self, id: SheepId)
    -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Customer orders.
pub trait OrderStore: Clone + Send + Sync + 'static {
    /// Orders newest first, optionally only those with `status`.
    fn list_orders(
        &self,
        status: Option<OrderStatus>,
    ) -> impl Future<Output = Result<Vec<Order>, RepositoryError>> + Send;

    /// A single order.
    fn get_order(
        &self,
        id: OrderId,
    ) -> impl Future<Output = Result<Option<Order>, RepositoryError>> + Send;

    /// Insert an order.
    fn create_order(
        &self,
        order: NewOrder,
    ) -> impl Future<Output = Result<Order, RepositoryError>> + Send;

    /// Apply a validated update to an order whose status is still
    /// `expected`. Fails with [`RepositoryError::Conflict`] when the status
    /// changed since it was read.
    fn update_order(
        &self,
        id: OrderId,
        expected: OrderStatus,
        update: OrderUpdate,
    ) -> impl Future<Output = Result<Order, RepositoryError>> + Send;

    /// Hard-delete an order.
    fn delete_order(&self, id: OrderId)
    -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Uploaded images. Write-once.
pub trait ImageStore: Clone + Send + Sync + 'static {
    /// Insert an image.
    fn create_image(
        &self,
        image: NewImage,
    ) -> impl Future<Output = Result<Image, RepositoryError>> + Send;

    /// A single image.
    fn get_image(
        &self,
        id: ImageId,
    ) -> impl Future<Output = Result<Option<Image>, RepositoryError>> + Send;
}

/// Stored (non-bootstrap) admins.
pub trait AdminStore: Clone + Send + Sync + 'static {
    /// All stored admins, oldest first.
    fn list_admins(&self) -> impl Future<Output = Result<Vec<Admin>, RepositoryError>> + Send;

    /// A single admin by id.
    fn get_admin(
        &self,
        id: AdminId,
    ) -> impl Future<Output = Result<Option<Admin>, RepositoryError>> + Send;

    /// Look up an admin by (normalized) email.
    fn get_admin_by_email(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<Option<Admin>, RepositoryError>> + Send;

    /// Insert an admin. Fails with [`RepositoryError::Conflict`] when the
    /// email is already stored.
    fn create_admin(
        &self,
        admin: NewAdmin,
    ) -> impl Future<Output = Result<Admin, RepositoryError>> + Send;

    /// Hard-delete an admin.
    fn delete_admin(&self, id: AdminId)
    -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Storefront user profiles, keyed by the auth provider's uid.
pub trait UserStore: Clone + Send + Sync + 'static {
    /// A single profile.
    fn get_user(
        &self,
        uid: &str,
    ) -> impl Future<Output = Result<Option<UserProfile>, RepositoryError>> + Send;

    /// Create or replace a profile. `created_at` survives replacement.
    fn upsert_user(
        &self,
        profile: NewUserProfile,
    ) -> impl Future<Output = Result<UserProfile, RepositoryError>> + Send;
}

/// The full persistence port.
pub trait Store: SheepStore + OrderStore + ImageStore + AdminStore + UserStore {
    /// Cheap connectivity check for readiness probes.
    fn ping(&self) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}
