//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ApiConfig;
use crate::services::{AdminDirectory, ImageHostError, ImageResolver, ImageStorage};
use crate::store::Store;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and is generic over the
/// persistence adapter so the same router serves both the in-memory and the
/// `PostgreSQL` store.
pub struct AppState<S> {
    inner: Arc<AppStateInner<S>>,
}

struct AppStateInner<S> {
    config: ApiConfig,
    store: S,
    images: ImageResolver<S>,
    storage: ImageStorage,
    admins: AdminDirectory,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Store> AppState<S> {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the image host client cannot be built.
    pub fn new(config: ApiConfig, store: S) -> Result<Self, ImageHostError> {
        let storage = ImageStorage::from_config(&config.image_storage)?;
        Ok(Self::with_storage(config, store, storage))
    }

    /// Create state with an explicit upload destination.
    #[must_use]
    pub fn with_storage(config: ApiConfig, store: S, storage: ImageStorage) -> Self {
        let images = ImageResolver::new(store.clone(), config.resolved_image_cache_ttl);
        let admins = AdminDirectory::new(config.primary_admin_email.clone());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                images,
                storage,
                admins,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the persistence adapter.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.inner.store
    }

    /// Get a reference to the image reference resolver.
    #[must_use]
    pub fn images(&self) -> &ImageResolver<S> {
        &self.inner.images
    }

    /// Get a reference to the upload destination.
    #[must_use]
    pub fn storage(&self) -> &ImageStorage {
        &self.inner.storage
    }

    /// Get a reference to the admin directory.
    #[must_use]
    pub fn admins(&self) -> &AdminDirectory {
        &self.inner.admins
    }
}
