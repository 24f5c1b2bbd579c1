//! Image rows.

use chrono::{DateTime, Utc};
use kabsh_core::ImageId;
use kabsh_core::models::{Image, ImageSource, NewImage};
use sqlx::PgExecutor;

use super::PgStore;
use crate::store::{ImageStore, RepositoryError};

const IMAGE_COLUMNS: &str = "id, mime_type, original_file_name, file_size, \
     image_url, thumbnail_url, delete_url, data, created_at";

/// Internal row type for `PostgreSQL` image queries.
#[derive(Debug, sqlx::FromRow)]
struct ImageRow {
    id: i32,
    mime_type: String,
    original_file_name: Option<String>,
    file_size: Option<i64>,
    image_url: Option<String>,
    thumbnail_url: Option<String>,
    delete_url: Option<String>,
    data: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ImageRow> for Image {
    type Error = RepositoryError;

    fn try_from(row: ImageRow) -> Result<Self, Self::Error> {
        let source = match (row.image_url, row.data) {
            (Some(image_url), None) => ImageSource::Hosted {
                image_url,
                thumbnail_url: row.thumbnail_url,
                delete_url: row.delete_url,
            },
            (None, Some(data)) => ImageSource::Inline { data },
            _ => {
                return Err(RepositoryError::DataCorruption(format!(
                    "image {} must have exactly one of image_url and data",
                    row.id
                )));
            }
        };

        Ok(Self {
            id: ImageId::new(row.id),
            mime_type: row.mime_type,
            original_file_name: row.original_file_name,
            file_size: row.file_size,
            source,
            created_at: row.created_at,
        })
    }
}

/// Insert an image on any executor, so it can join a transaction.
pub(super) async fn insert_image<'e, E>(executor: E, image: NewImage) -> Result<Image, RepositoryError>
where
    E: PgExecutor<'e>,
{
    let (image_url, thumbnail_url, delete_url, data) = match image.source {
        ImageSource::Hosted {
            image_url,
            thumbnail_url,
            delete_url,
        } => (Some(image_url), thumbnail_url, delete_url, None),
        ImageSource::Inline { data } => (None, None, None, Some(data)),
    };

    let sql = format!(
        "INSERT INTO images \
             (mime_type, original_file_name, file_size, image_url, thumbnail_url, delete_url, data) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {IMAGE_COLUMNS}"
    );
    let row = sqlx::query_as::<_, ImageRow>(&sql)
        .bind(image.mime_type)
        .bind(image.original_file_name)
        .bind(image.file_size)
        .bind(image_url)
        .bind(thumbnail_url)
        .bind(delete_url)
        .bind(data)
        .fetch_one(executor)
        .await?;

    row.try_into()
}

impl ImageStore for PgStore {
    async fn create_image(&self, image: NewImage) -> Result<Image, RepositoryError> {
        insert_image(&self.pool, image).await
    }

    async fn get_image(&self, id: ImageId) -> Result<Option<Image>, RepositoryError> {
        let sql = format!("SELECT {IMAGE_COLUMNS} FROM images WHERE id = $1");
        let row = sqlx::query_as::<_, ImageRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }
}
