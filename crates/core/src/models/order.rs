//! Orders and their line items.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ImageRef, OrderId, OrderStatus, SheepId};

/// A line in an order.
///
/// Name, price and picture are copied from the listing when the order is
/// placed; later edits to the sheep do not touch existing orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub sheep_id: SheepId,
    pub sheep_name: String,
    #[serde(rename = "sheepImageId", default, skip_serializing_if = "Option::is_none")]
    pub sheep_image: Option<ImageRef>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
}

/// A customer order with its shipping destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub user_name: String,
    pub user_phone: String,
    pub wilaya_code: String,
    pub wilaya_name: String,
    pub commune_id: i32,
    pub commune_name: String,
    pub items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Total number of animals across all lines.
    #[must_use]
    pub fn head_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}
