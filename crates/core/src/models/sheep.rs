//! Sheep listing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::catalog::discounted_price;
use crate::types::{ImageRef, SheepCategory, SheepId};

/// A sheep offered for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheep {
    pub id: SheepId,
    pub name: String,
    pub category: SheepCategory,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub discount_percentage: Option<Decimal>,
    /// Stored picture references, in display order.
    pub image_ids: Vec<ImageRef>,
    pub age: String,
    pub weight: String,
    pub breed: String,
    pub health_status: String,
    pub description: String,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sheep {
    /// Price after the discount, if any.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        discounted_price(self.price, self.discount_percentage)
    }
}
