//! Sheep listing rules.

use rust_decimal::Decimal;
use serde::Deserialize;

use super::{Validated, ValidationError, double_option, required_text};
use crate::models::Sheep;
use crate::types::{ImageRef, SheepCategory};

const MIN_DESCRIPTION_CHARS: usize = 10;

/// Raw sheep input, used both for creation and as a PATCH body.
///
/// Pictures may be sent as `imageIds` or `images`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SheepDraft {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    #[serde(deserialize_with = "double_option")]
    pub discount_percentage: Option<Option<Decimal>>,
    #[serde(alias = "images")]
    pub image_ids: Option<Vec<ImageRef>>,
    pub age: Option<String>,
    pub weight: Option<String>,
    pub breed: Option<String>,
    pub health_status: Option<String>,
    pub description: Option<String>,
    pub is_featured: Option<bool>,
}

/// A sheep that passed validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSheep {
    pub name: String,
    pub category: SheepCategory,
    pub price: Decimal,
    pub discount_percentage: Option<Decimal>,
    pub image_ids: Vec<ImageRef>,
    pub age: String,
    pub weight: String,
    pub breed: String,
    pub health_status: String,
    pub description: String,
    pub is_featured: bool,
}

impl From<&Sheep> for SheepDraft {
    fn from(sheep: &Sheep) -> Self {
        Self {
            name: Some(sheep.name.clone()),
            category: Some(sheep.category.label().to_owned()),
            price: Some(sheep.price),
            discount_percentage: Some(sheep.discount_percentage),
            image_ids: Some(sheep.image_ids.clone()),
            age: Some(sheep.age.clone()),
            weight: Some(sheep.weight.clone()),
            breed: Some(sheep.breed.clone()),
            health_status: Some(sheep.health_status.clone()),
            description: Some(sheep.description.clone()),
            is_featured: Some(sheep.is_featured),
        }
    }
}

impl SheepDraft {
    /// Overlay the fields present in `patch` on top of `self`.
    #[must_use]
    pub fn merge(self, patch: Self) -> Self {
        Self {
            name: patch.name.or(self.name),
            category: patch.category.or(self.category),
            price: patch.price.or(self.price),
            discount_percentage: patch.discount_percentage.or(self.discount_percentage),
            image_ids: patch.image_ids.or(self.image_ids),
            age: patch.age.or(self.age),
            weight: patch.weight.or(self.weight),
            breed: patch.breed.or(self.breed),
            health_status: patch.health_status.or(self.health_status),
            description: patch.description.or(self.description),
            is_featured: patch.is_featured.or(self.is_featured),
        }
    }

    /// Validate a complete listing.
    ///
    /// # Errors
    ///
    /// Returns the first failing field.
    pub fn validate(self) -> Validated<NewSheep> {
        self.validate_with_uploads(0)
    }

    /// Validate a listing whose pictures will be partly supplied by
    /// `pending_uploads` images created in the same unit of work.
    ///
    /// # Errors
    ///
    /// Returns the first failing field.
    pub fn validate_with_uploads(self, pending_uploads: usize) -> Validated<NewSheep> {
        let name = required_text(self.name, "name", "اسم الخروف مطلوب")?;

        let category = self
            .category
            .as_deref()
            .and_then(|c| c.parse::<SheepCategory>().ok())
            .ok_or_else(|| ValidationError::new("category", "الفئة غير صالحة"))?;

        let price = self
            .price
            .filter(|p| !p.is_sign_negative())
            .ok_or_else(|| ValidationError::new("price", "السعر يجب أن يكون موجباً"))?;

        let discount_percentage = self.discount_percentage.flatten();
        if let Some(discount) = discount_percentage
            && (discount < Decimal::ZERO || discount > Decimal::ONE_HUNDRED)
        {
            return Err(ValidationError::new(
                "discountPercentage",
                "النسبة يجب أن تكون بين 0 و 100",
            ));
        }

        let image_ids = self.image_ids.unwrap_or_default();
        if image_ids.is_empty() && pending_uploads == 0 {
            return Err(ValidationError::new(
                "imageIds",
                "يجب إضافة صورة واحدة على الأقل",
            ));
        }

        let age = required_text(self.age, "age", "العمر مطلوب")?;
        let weight = required_text(self.weight, "weight", "الوزن مطلوب")?;
        let breed = required_text(self.breed, "breed", "السلالة مطلوبة")?;
        let health_status =
            required_text(self.health_status, "healthStatus", "الحالة الصحية مطلوبة")?;

        let description = self.description.unwrap_or_default().trim().to_owned();
        if description.chars().count() < MIN_DESCRIPTION_CHARS {
            return Err(ValidationError::new(
                "description",
                "الوصف يجب أن يكون 10 أحرف على الأقل",
            ));
        }

        Ok(NewSheep {
            name,
            category,
            price,
            discount_percentage,
            image_ids,
            age,
            weight,
            breed,
            health_status,
            description,
            is_featured: self.is_featured.unwrap_or(false),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::ImageId;

    fn draft() -> SheepDraft {
        serde_json::from_value(serde_json::json!({
            "name": "خروف محلي ممتاز",
            "category": "محلي",
            "price": 85000,
            "discountPercentage": 10,
            "imageIds": ["https://images.unsplash.com/photo-1.jpg", 7],
            "age": "سنتان",
            "weight": "85 كجم",
            "breed": "العواسي",
            "healthStatus": "ممتاز",
            "description": "خروف محلي بصحة ممتازة وتغذية طبيعية"
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_draft() {
        let sheep = draft().validate().unwrap();
        assert_eq!(sheep.category, SheepCategory::Local);
        assert_eq!(sheep.price, Decimal::from(85000));
        assert_eq!(sheep.discount_percentage, Some(Decimal::from(10)));
        assert_eq!(sheep.image_ids[1], ImageRef::Id(ImageId::new(7)));
        assert!(!sheep.is_featured);
    }

    #[test]
    fn test_images_alias() {
        let d: SheepDraft =
            serde_json::from_str(r#"{"images": ["https://example.com/a.jpg"]}"#).unwrap();
        assert_eq!(d.image_ids.unwrap().len(), 1);
    }

    #[test]
    fn test_price_accepts_numeric_string() {
        let d: SheepDraft = serde_json::from_str(r#"{"price": "1500.50"}"#).unwrap();
        assert_eq!(d.price, Some(Decimal::new(150_050, 2)));
    }

    #[test]
    fn test_missing_name_is_first_error() {
        let mut d = draft();
        d.name = None;
        d.category = Some("غير معروف".to_owned());
        let err = d.validate().unwrap_err();
        assert_eq!(err.field, "name");
        assert_eq!(err.message, "اسم الخروف مطلوب");
    }

    #[test]
    fn test_invalid_category() {
        let mut d = draft();
        d.category = Some("أجنبي".to_owned());
        assert_eq!(d.validate().unwrap_err().message, "الفئة غير صالحة");
    }

    #[test]
    fn test_negative_price() {
        let mut d = draft();
        d.price = Some(Decimal::from(-1));
        assert_eq!(d.validate().unwrap_err().field, "price");
    }

    #[test]
    fn test_discount_bounds() {
        let mut d = draft();
        d.discount_percentage = Some(Some(Decimal::from(101)));
        assert_eq!(d.validate().unwrap_err().field, "discountPercentage");

        let mut d = draft();
        d.discount_percentage = Some(Some(Decimal::ONE_HUNDRED));
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_no_images_unless_uploads_pending() {
        let mut d = draft();
        d.image_ids = Some(Vec::new());
        assert_eq!(
            d.clone().validate().unwrap_err().message,
            "يجب إضافة صورة واحدة على الأقل"
        );
        assert!(d.validate_with_uploads(1).is_ok());
    }

    #[test]
    fn test_description_counts_characters_not_bytes() {
        let mut d = draft();
        // 9 Arabic letters, 18 bytes.
        d.description = Some("أبتثجحخدذ".to_owned());
        assert_eq!(d.clone().validate().unwrap_err().field, "description");
        d.description = Some("أبتثجحخدذر".to_owned());
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_merge_patch_overrides_and_clears_discount() {
        let base = draft();
        let patch: SheepDraft =
            serde_json::from_str(r#"{"price": 90000, "discountPercentage": null}"#).unwrap();
        let merged = base.merge(patch).validate().unwrap();
        assert_eq!(merged.price, Decimal::from(90000));
        assert_eq!(merged.discount_percentage, None);
        assert_eq!(merged.name, "خروف محلي ممتاز");
    }

    #[test]
    fn test_merge_keeps_discount_when_absent() {
        let patch: SheepDraft = serde_json::from_str(r#"{"isFeatured": true}"#).unwrap();
        let merged = draft().merge(patch).validate().unwrap();
        assert_eq!(merged.discount_percentage, Some(Decimal::from(10)));
        assert!(merged.is_featured);
    }
}
