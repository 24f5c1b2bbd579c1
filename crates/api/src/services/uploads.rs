//! Upload pipeline: validated upload in, storable image out.

use kabsh_core::models::{ImageSource, NewImage};
use kabsh_core::validation::ImageUpload;
use tracing::info;

use super::imgbb::{ImageHostError, ImgBbClient};
use crate::config::ImageStorageConfig;

/// Destination for uploaded bytes.
#[derive(Clone)]
pub enum ImageStorage {
    /// Keep the base64 payload in the store.
    Inline,
    /// Push to ImgBB and store only the URLs.
    ImgBb(ImgBbClient),
}

impl ImageStorage {
    /// Build from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the ImgBB HTTP client fails to build.
    pub fn from_config(config: &ImageStorageConfig) -> Result<Self, ImageHostError> {
        Ok(match config {
            ImageStorageConfig::Inline => Self::Inline,
            ImageStorageConfig::ImgBb { api_key } => Self::ImgBb(ImgBbClient::new(api_key.clone())?),
        })
    }

    /// Turn an upload into an image record ready to insert, uploading to the
    /// host first when one is configured.
    ///
    /// # Errors
    ///
    /// Returns error if the host upload fails.
    pub async fn prepare(&self, upload: ImageUpload) -> Result<NewImage, ImageHostError> {
        let file_size = i64::try_from(upload.byte_len).ok();
        let source = match self {
            Self::Inline => ImageSource::Inline {
                data: upload.base64,
            },
            Self::ImgBb(client) => {
                let hosted = client.upload(&upload).await?;
                info!(url = %hosted.url, "Image uploaded to ImgBB");
                ImageSource::Hosted {
                    image_url: hosted.url,
                    thumbnail_url: Some(hosted.thumbnail_url),
                    delete_url: hosted.delete_url,
                }
            }
        };

        Ok(NewImage {
            mime_type: upload.mime_type,
            original_file_name: upload.original_file_name,
            file_size,
            source,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use kabsh_core::validation::ImageUploadDraft;

    use super::*;

    #[tokio::test]
    async fn test_inline_keeps_stripped_payload() {
        let upload = ImageUploadDraft {
            image_data: Some("data:image/gif;base64,R0lGODlh".to_owned()),
            mime_type: Some("image/gif".to_owned()),
            original_file_name: Some("kabsh.gif".to_owned()),
        }
        .validate()
        .unwrap();

        let image = ImageStorage::Inline.prepare(upload).await.unwrap();
        assert_eq!(image.mime_type, "image/gif");
        assert_eq!(image.file_size, Some(6));
        assert_eq!(
            image.source,
            ImageSource::Inline {
                data: "R0lGODlh".to_owned()
            }
        );
    }
}
