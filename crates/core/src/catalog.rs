//! Catalog pricing and browsing.

use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Sheep;
use crate::types::{SheepCategory, UnknownVariant};

/// Label of the grouped "imported" filter.
pub const FOREIGN_CATEGORY: &str = "أجنبي";

/// Price after applying an optional percentage discount, rounded to two
/// decimals.
#[must_use]
pub fn discounted_price(price: Decimal, discount_percentage: Option<Decimal>) -> Decimal {
    let Some(discount) = discount_percentage.filter(|d| !d.is_zero()) else {
        return price;
    };
    (price * (Decimal::ONE_HUNDRED - discount) / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Category filter for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    Only(SheepCategory),
    /// Every imported breed.
    Foreign,
}

impl CategoryFilter {
    fn matches(self, category: SheepCategory) -> bool {
        match self {
            Self::Only(c) => c == category,
            Self::Foreign => category.is_foreign(),
        }
    }

    /// Parse a query value. `"all"` and the empty string mean no filter.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownVariant`] for anything else that is not a category.
    pub fn parse(raw: &str) -> Result<Option<Self>, UnknownVariant> {
        match raw.trim() {
            "" | "all" => Ok(None),
            FOREIGN_CATEGORY | "foreign" => Ok(Some(Self::Foreign)),
            other => other.parse::<SheepCategory>().map(|c| Some(Self::Only(c))),
        }
    }
}

/// Listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

impl FromStr for SortOrder {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "newest" => Ok(Self::Newest),
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            other => Err(UnknownVariant {
                kind: "sort order",
                value: other.to_owned(),
            }),
        }
    }
}

/// Filters and ordering applied to a sheep listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SheepQuery {
    pub category: Option<CategoryFilter>,
    pub featured: Option<bool>,
    pub sort: SortOrder,
}

impl SheepQuery {
    /// Whether a single sheep passes the filters.
    #[must_use]
    pub fn matches(&self, sheep: &Sheep) -> bool {
        self.category.is_none_or(|c| c.matches(sheep.category))
            && self.featured.is_none_or(|f| f == sheep.is_featured)
    }

    /// Filter and sort a listing. Ties keep the newest first.
    #[must_use]
    pub fn apply(&self, sheep: Vec<Sheep>) -> Vec<Sheep> {
        let mut out: Vec<Sheep> = sheep.into_iter().filter(|s| self.matches(s)).collect();
        out.sort_by(|a, b| {
            let newest = b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id));
            match self.sort {
                SortOrder::Newest => newest,
                SortOrder::PriceAsc => a.effective_price().cmp(&b.effective_price()).then(newest),
                SortOrder::PriceDesc => b.effective_price().cmp(&a.effective_price()).then(newest),
            }
        });
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::types::SheepId;

    fn sheep(id: i32, category: SheepCategory, price: i64, discount: Option<i64>) -> Sheep {
        let at = Utc::now() + Duration::seconds(i64::from(id));
        Sheep {
            id: SheepId::new(id),
            name: format!("خروف {id}"),
            category,
            price: Decimal::from(price),
            discount_percentage: discount.map(Decimal::from),
            image_ids: Vec::new(),
            age: "سنة".to_owned(),
            weight: "50 كجم".to_owned(),
            breed: "أولاد جلال".to_owned(),
            health_status: "ممتاز".to_owned(),
            description: "وصف طويل بما يكفي".to_owned(),
            is_featured: id % 2 == 0,
            created_at: at,
            updated_at: at,
        }
    }

    fn flock() -> Vec<Sheep> {
        vec![
            sheep(1, SheepCategory::Local, 85_000, Some(10)),
            sheep(2, SheepCategory::Romanian, 70_000, None),
            sheep(3, SheepCategory::Spanish, 80_000, Some(20)),
            sheep(4, SheepCategory::Local, 60_000, None),
        ]
    }

    fn ids(list: &[Sheep]) -> Vec<i32> {
        list.iter().map(|s| s.id.as_i32()).collect()
    }

    #[test]
    fn test_discounted_price() {
        assert_eq!(
            discounted_price(Decimal::from(85_000), Some(Decimal::from(10))),
            Decimal::from(76_500)
        );
        assert_eq!(discounted_price(Decimal::from(100), None), Decimal::from(100));
        assert_eq!(
            discounted_price(Decimal::from(100), Some(Decimal::ONE_HUNDRED)),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_newest_first_by_default() {
        assert_eq!(ids(&SheepQuery::default().apply(flock())), [4, 3, 2, 1]);
    }

    #[test]
    fn test_foreign_groups_imported_breeds() {
        let query = SheepQuery {
            category: CategoryFilter::parse("أجنبي").unwrap(),
            ..SheepQuery::default()
        };
        assert_eq!(ids(&query.apply(flock())), [3, 2]);
    }

    #[test]
    fn test_sort_by_effective_price() {
        let query = SheepQuery {
            sort: "price-asc".parse().unwrap(),
            ..SheepQuery::default()
        };
        // Effective: 76500, 70000, 64000, 60000.
        assert_eq!(ids(&query.apply(flock())), [4, 3, 2, 1]);

        let query = SheepQuery {
            sort: SortOrder::PriceDesc,
            featured: Some(false),
            ..SheepQuery::default()
        };
        assert_eq!(ids(&query.apply(flock())), [1, 3]);
    }

    #[test]
    fn test_category_filter_parse() {
        assert_eq!(CategoryFilter::parse("all").unwrap(), None);
        assert_eq!(
            CategoryFilter::parse("محلي").unwrap(),
            Some(CategoryFilter::Only(SheepCategory::Local))
        );
        assert!(CategoryFilter::parse("goat").is_err());
        assert!("cheapest".parse::<SortOrder>().is_err());
    }
}
