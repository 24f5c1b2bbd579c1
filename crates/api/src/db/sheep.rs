//! Sheep rows.

use chrono::{DateTime, Utc};
use kabsh_core::models::{Image, NewImage, Sheep};
use kabsh_core::validation::NewSheep;
use kabsh_core::{ImageRef, SheepCategory, SheepId};
use rust_decimal::Decimal;
use sqlx::PgExecutor;
use sqlx::types::Json;

use super::images::insert_image;
use super::{PgStore, expect_one};
use crate::store::{RepositoryError, SheepStore};

const SHEEP_COLUMNS: &str = "id, name, category, price, discount_percentage, image_ids, \
     age, weight, breed, health_status, description, is_featured, created_at, updated_at";

/// Internal row type for `PostgreSQL` sheep queries.
#[derive(Debug, sqlx::FromRow)]
struct SheepRow {
    id: i32,
    name: String,
    category: SheepCategory,
    price: Decimal,
    discount_percentage: Option<Decimal>,
    image_ids: Json<Vec<ImageRef>>,
    age: String,
    weight: String,
    breed: String,
    health_status: String,
    description: String,
    is_featured: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SheepRow> for Sheep {
    fn from(row: SheepRow) -> Self {
        Self {
            id: SheepId::new(row.id),
            name: row.name,
            category: row.category,
            price: row.price,
            discount_percentage: row.discount_percentage,
            image_ids: row.image_ids.0,
            age: row.age,
            weight: row.weight,
            breed: row.breed,
            health_status: row.health_status,
            description: row.description,
            is_featured: row.is_featured,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

async fn insert_sheep<'e, E>(executor: E, sheep: NewSheep) -> Result<Sheep, RepositoryError>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "INSERT INTO sheep \
             (name, category, price, discount_percentage, image_ids, \
              age, weight, breed, health_status, description, is_featured) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING {SHEEP_COLUMNS}"
    );
    let row = sqlx::query_as::<_, SheepRow>(&sql)
        .bind(sheep.name)
        .bind(sheep.category)
        .bind(sheep.price)
        .bind(sheep.discount_percentage)
        .bind(Json(sheep.image_ids))
        .bind(sheep.age)
        .bind(sheep.weight)
        .bind(sheep.breed)
        .bind(sheep.health_status)
        .bind(sheep.description)
        .bind(sheep.is_featured)
        .fetch_one(executor)
        .await?;

    Ok(row.into())
}

impl SheepStore for PgStore {
    async fn list_sheep(&self) -> Result<Vec<Sheep>, RepositoryError> {
        let sql = format!("SELECT {SHEEP_COLUMNS} FROM sheep ORDER BY created_at DESC, id DESC");
        let rows = sqlx::query_as::<_, SheepRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_sheep(&self, id: SheepId) -> Result<Option<Sheep>, RepositoryError> {
        let sql = format!("SELECT {SHEEP_COLUMNS} FROM sheep WHERE id = $1");
        let row = sqlx::query_as::<_, SheepRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn create_sheep(&self, sheep: NewSheep) -> Result<Sheep, RepositoryError> {
        insert_sheep(&self.pool, sheep).await
    }

    async fn create_sheep_with_images(
        &self,
        mut sheep: NewSheep,
        images: Vec<NewImage>,
    ) -> Result<(Sheep, Vec<Image>), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let mut created = Vec::with_capacity(images.len());
        for new in images {
            let image = insert_image(&mut *tx, new).await?;
            sheep.image_ids.push(ImageRef::Id(image.id));
            created.push(image);
        }
        let sheep = insert_sheep(&mut *tx, sheep).await?;

        tx.commit().await?;
        Ok((sheep, created))
    }

    async fn update_sheep(&self, id: SheepId, sheep: NewSheep) -> Result<Sheep, RepositoryError> {
        let sql = format!(
            "UPDATE sheep SET \
                 name = $2, category = $3, price = $4, discount_percentage = $5, \
                 image_ids = $6, age = $7, weight = $8, breed = $9, \
                 health_status = $10, description = $11, is_featured = $12, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {SHEEP_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SheepRow>(&sql)
            .bind(id.as_i32())
            .bind(sheep.name)
            .bind(sheep.category)
            .bind(sheep.price)
            .bind(sheep.discount_percentage)
            .bind(Json(sheep.image_ids))
            .bind(sheep.age)
            .bind(sheep.weight)
            .bind(sheep.breed)
            .bind(sheep.health_status)
            .bind(sheep.description)
            .bind(sheep.is_featured)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    async fn delete_sheep(&self, id: SheepId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM sheep WHERE id = $1")
            .bind(id.as_i32())
            .execute(&self.pool)
            .await?;

        expect_one(result.rows_affected())
    }
}
