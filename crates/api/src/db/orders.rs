//! Order rows.

use chrono::{DateTime, Utc};
use kabsh_core::models::{Order, OrderItem};
use kabsh_core::validation::{NewOrder, OrderUpdate};
use kabsh_core::{OrderId, OrderStatus};
use rust_decimal::Decimal;
use sqlx::types::Json;

use super::{PgStore, expect_one};
use crate::store::{OrderStore, RepositoryError};

const ORDER_COLUMNS: &str = "id, user_id, user_name, user_phone, wilaya_code, wilaya_name, \
     commune_id, commune_name, items, total_amount, status, notes, created_at, updated_at";

/// Internal row type for `PostgreSQL` order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: Option<String>,
    user_name: String,
    user_phone: String,
    wilaya_code: String,
    wilaya_name: String,
    commune_id: i32,
    commune_name: String,
    items: Json<Vec<OrderItem>>,
    total_amount: Decimal,
    status: OrderStatus,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            user_id: row.user_id,
            user_name: row.user_name,
            user_phone: row.user_phone,
            wilaya_code: row.wilaya_code,
            wilaya_name: row.wilaya_name,
            commune_id: row.commune_id,
            commune_name: row.commune_name,
            items: row.items.0,
            total_amount: row.total_amount,
            status: row.status,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl OrderStore for PgStore {
    async fn list_orders(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE $1::order_status IS NULL OR status = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn create_order(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        let sql = format!(
            "INSERT INTO orders \
                 (user_id, user_name, user_phone, wilaya_code, wilaya_name, \
                  commune_id, commune_name, items, total_amount, status, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {ORDER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(order.user_id)
            .bind(order.user_name)
            .bind(order.user_phone)
            .bind(order.wilaya_code)
            .bind(order.wilaya_name)
            .bind(order.commune_id)
            .bind(order.commune_name)
            .bind(Json(order.items))
            .bind(order.total_amount)
            .bind(order.status)
            .bind(order.notes)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn update_order(
        &self,
        id: OrderId,
        expected: OrderStatus,
        update: OrderUpdate,
    ) -> Result<Order, RepositoryError> {
        let (set_notes, notes) = match update.notes {
            Some(notes) => (true, notes),
            None => (false, None),
        };
        let sql = format!(
            "UPDATE orders SET \
                 status = COALESCE($2, status), \
                 notes = CASE WHEN $3 THEN $4 ELSE notes END, \
                 updated_at = NOW() \
             WHERE id = $1 AND status = $5 \
             RETURNING {ORDER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id.as_i32())
            .bind(update.status)
            .bind(set_notes)
            .bind(notes)
            .bind(expected)
            .fetch_optional(&self.pool)
            .await?;
        if let Some(row) = row {
            return Ok(row.into());
        }

        let current: Option<OrderStatus> =
            sqlx::query_scalar("SELECT status FROM orders WHERE id = $1")
                .bind(id.as_i32())
                .fetch_optional(&self.pool)
                .await?;
        match current {
            Some(status) => Err(RepositoryError::Conflict(format!(
                "order status is {status}, expected {expected}"
            ))),
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn delete_order(&self, id: OrderId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_i32())
            .execute(&self.pool)
            .await?;

        expect_one(result.rows_affected())
    }
}
