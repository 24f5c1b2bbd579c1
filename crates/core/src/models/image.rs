//! Uploaded pictures.

use chrono::{DateTime, Utc};

use crate::types::ImageId;

/// Where the picture bytes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Uploaded to a third-party image host.
    Hosted {
        image_url: String,
        thumbnail_url: Option<String>,
        delete_url: Option<String>,
    },
    /// Kept in our own store as base64 text.
    Inline { data: String },
}

/// An image ready to be inserted. Ids and timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
    pub mime_type: String,
    pub original_file_name: Option<String>,
    pub file_size: Option<i64>,
    pub source: ImageSource,
}

/// A stored image. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub id: ImageId,
    pub mime_type: String,
    pub original_file_name: Option<String>,
    pub file_size: Option<i64>,
    pub source: ImageSource,
    pub created_at: DateTime<Utc>,
}

impl Image {
    /// Build the stored record from an insert payload.
    #[must_use]
    pub fn from_new(id: ImageId, new: NewImage, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            mime_type: new.mime_type,
            original_file_name: new.original_file_name,
            file_size: new.file_size,
            source: new.source,
            created_at,
        }
    }

    /// A URL a browser can render: the hosted URL, or a `data:` URL built
    /// from the inline payload.
    #[must_use]
    pub fn display_url(&self) -> String {
        match &self.source {
            ImageSource::Hosted { image_url, .. } => image_url.clone(),
            ImageSource::Inline { data } => format!("data:{};base64,{data}", self.mime_type),
        }
    }

    /// Thumbnail URL when the host produced one.
    #[must_use]
    pub fn thumbnail_url(&self) -> Option<&str> {
        match &self.source {
            ImageSource::Hosted { thumbnail_url, .. } => thumbnail_url.as_deref(),
            ImageSource::Inline { .. } => None,
        }
    }

    /// Whether the bytes are held locally.
    #[must_use]
    pub const fn is_inline(&self) -> bool {
        matches!(self.source, ImageSource::Inline { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(source: ImageSource) -> Image {
        Image {
            id: ImageId::new(1),
            mime_type: "image/png".to_owned(),
            original_file_name: None,
            file_size: Some(3),
            source,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_inline_display_url_is_data_url() {
        let img = image(ImageSource::Inline {
            data: "AAEC".to_owned(),
        });
        assert_eq!(img.display_url(), "data:image/png;base64,AAEC");
        assert!(img.thumbnail_url().is_none());
        assert!(img.is_inline());
    }

    #[test]
    fn test_hosted_display_url_passes_through() {
        let img = image(ImageSource::Hosted {
            image_url: "https://i.ibb.co/abc/full.png".to_owned(),
            thumbnail_url: Some("https://i.ibb.co/abc/thumb.png".to_owned()),
            delete_url: None,
        });
        assert_eq!(img.display_url(), "https://i.ibb.co/abc/full.png");
        assert_eq!(img.thumbnail_url(), Some("https://i.ibb.co/abc/thumb.png"));
    }
}
