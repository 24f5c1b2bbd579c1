//! Image reference resolution.
//!
//! Listings and order lines store [`ImageRef`]s. Before they are sent to a
//! client each reference becomes a displayable URL: URLs pass through, ids
//! are looked up and turned into the hosted URL or a `data:` URL.
//!
//! Images are immutable, so resolved ids are cached (`moka`, TTL from
//! configuration, weighted by URL length since inline images are large).

use std::sync::Arc;
use std::time::Duration;

use kabsh_core::{ImageId, ImageRef};
use moka::future::Cache;
use tracing::{debug, warn};

use crate::store::ImageStore;

/// Upper bound on cached URL bytes.
const CACHE_MAX_BYTES: u64 = 64 * 1024 * 1024;

/// Resolves image references to URLs.
#[derive(Clone)]
pub struct ImageResolver<S> {
    inner: Arc<ImageResolverInner<S>>,
}

struct ImageResolverInner<S> {
    store: S,
    cache: Cache<ImageId, Arc<str>>,
}

impl<S: ImageStore> ImageResolver<S> {
    /// Create a resolver over `store`.
    #[must_use]
    pub fn new(store: S, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .weigher(|_id: &ImageId, url: &Arc<str>| u32::try_from(url.len()).unwrap_or(u32::MAX))
            .max_capacity(CACHE_MAX_BYTES)
            .time_to_live(ttl)
            .build();

        Self {
            inner: Arc::new(ImageResolverInner { store, cache }),
        }
    }

    /// Resolve a single reference. `None` when the id has no image or the
    /// lookup failed; failures are logged, not returned.
    pub async fn resolve_one(&self, reference: &ImageRef) -> Option<String> {
        let id = match reference {
            ImageRef::Url(url) => return Some(url.clone()),
            ImageRef::Id(id) => *id,
        };

        if let Some(url) = self.inner.cache.get(&id).await {
            debug!(image_id = %id, "Resolved image from cache");
            return Some(url.to_string());
        }

        match self.inner.store.get_image(id).await {
            Ok(Some(image)) => {
                let url: Arc<str> = Arc::from(image.display_url());
                self.inner.cache.insert(id, Arc::clone(&url)).await;
                Some(url.to_string())
            }
            Ok(None) => {
                warn!(image_id = %id, "Referenced image does not exist, skipping");
                None
            }
            Err(e) => {
                warn!(image_id = %id, error = %e, "Image lookup failed, skipping");
                None
            }
        }
    }

    /// Resolve references in order, skipping the ones that cannot be
    /// resolved.
    pub async fn resolve(&self, references: &[ImageRef]) -> Vec<String> {
        let mut urls = Vec::with_capacity(references.len());
        for reference in references {
            if let Some(url) = self.resolve_one(reference).await {
                urls.push(url);
            }
        }
        urls
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use kabsh_core::models::{ImageSource, NewImage};

    use super::*;
    use crate::store::MemoryStore;

    async fn store_with_image() -> (MemoryStore, ImageId) {
        let store = MemoryStore::new();
        let image = store
            .create_image(NewImage {
                mime_type: "image/webp".to_owned(),
                original_file_name: None,
                file_size: Some(3),
                source: ImageSource::Inline {
                    data: "AAEC".to_owned(),
                },
            })
            .await
            .unwrap();
        (store, image.id)
    }

    #[tokio::test]
    async fn test_url_passthrough() {
        let resolver = ImageResolver::new(MemoryStore::new(), Duration::from_secs(60));
        let url = "https://images.unsplash.com/photo-1.jpg".to_owned();
        assert_eq!(
            resolver.resolve(&[ImageRef::Url(url.clone())]).await,
            vec![url]
        );
    }

    #[tokio::test]
    async fn test_id_becomes_data_url() {
        let (store, id) = store_with_image().await;
        let resolver = ImageResolver::new(store, Duration::from_secs(60));
        assert_eq!(
            resolver.resolve_one(&ImageRef::Id(id)).await.unwrap(),
            "data:image/webp;base64,AAEC"
        );
        // Second read hits the cache.
        assert!(resolver.resolve_one(&ImageRef::Id(id)).await.is_some());
    }

    #[tokio::test]
    async fn test_missing_ids_are_skipped() {
        let (store, id) = store_with_image().await;
        let resolver = ImageResolver::new(store, Duration::from_secs(60));
        let urls = resolver
            .resolve(&[
                ImageRef::Id(ImageId::new(999)),
                ImageRef::Id(id),
                ImageRef::Url("https://example.com/b.jpg".to_owned()),
            ])
            .await;
        assert_eq!(
            urls,
            vec![
                "data:image/webp;base64,AAEC".to_owned(),
                "https://example.com/b.jpg".to_owned()
            ]
        );
    }
}
