//! Seed the catalogue with sample sheep.
//!
//! The samples go through the same validation as `POST /api/sheep`, so a
//! seeded database never holds a listing the API would have refused.

use kabsh_api::store::SheepStore;
use kabsh_core::validation::{NewSheep, SheepDraft};
use serde_json::json;

use super::{CommandError, connect};

/// Outcome of a seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Listings were inserted.
    Inserted(usize),
    /// The catalogue was not empty and `force` was off.
    Skipped { existing: usize },
}

/// Sample catalogue, validated.
///
/// # Errors
///
/// Returns the first validation failure.
pub fn sample_catalogue() -> Result<Vec<NewSheep>, CommandError> {
    let drafts: Vec<SheepDraft> = serde_json::from_value(json!([
        {
            "name": "خروف محلي ممتاز",
            "category": "محلي",
            "price": 85000,
            "discountPercentage": 10,
            "images": [
                "https://images.unsplash.com/photo-1583337130417-3346a1be7dee?w=800&h=800&fit=crop",
                "https://images.unsplash.com/photo-1563256905-dc104f8ece9b?w=800&h=800&fit=crop"
            ],
            "age": "سنتان",
            "weight": "85 كجم",
            "breed": "العواسي",
            "healthStatus": "ممتاز - تم الفحص البيطري",
            "description": "خروف عواسي محلي أصيل، صحة ممتازة، مناسب للأضحية. تم فحصه بيطرياً والتأكد من سلامته.",
            "isFeatured": true
        },
        {
            "name": "خروف روماني مميز",
            "category": "روماني",
            "price": 95000,
            "images": [
                "https://images.unsplash.com/photo-1548550023-2bdb3c5beed7?w=800&h=800&fit=crop",
                "https://images.unsplash.com/photo-1584267761987-f7e5b32fe2cd?w=800&h=800&fit=crop"
            ],
            "age": "سنة ونصف",
            "weight": "60 كجم",
            "breed": "روماني مستورد",
            "healthStatus": "جيد جداً",
            "description": "خروف روماني مستورد بصحة ممتازة، لحم طري وجودة عالية.",
            "isFeatured": true
        },
        {
            "name": "خروف إسباني فاخر",
            "category": "إسباني",
            "price": 120000,
            "discountPercentage": 15,
            "images": [
                "https://images.unsplash.com/photo-1569935339919-76d63379f328?w=800&h=800&fit=crop",
                "https://images.unsplash.com/photo-1588595276888-d6ca3e3f94a8?w=800&h=800&fit=crop"
            ],
            "age": "3 سنوات",
            "weight": "90 كجم",
            "breed": "إسباني أصيل",
            "healthStatus": "ممتاز - شهادة صحية",
            "description": "خروف إسباني أصيل من أفضل السلالات، وزن مثالي وصحة ممتازة مع شهادة صحية معتمدة.",
            "isFeatured": true
        },
        {
            "name": "خروف محلي - عرض خاص",
            "category": "محلي",
            "price": 75000,
            "discountPercentage": 20,
            "images": [
                "https://images.unsplash.com/photo-1550419541-e0b6d33fc4b5?w=800&h=800&fit=crop",
                "https://images.unsplash.com/photo-1572788784834-0a6d8f062e9e?w=800&h=800&fit=crop"
            ],
            "age": "سنتان",
            "weight": "75 كجم",
            "breed": "البربري",
            "healthStatus": "جيد جداً",
            "description": "خروف بربري محلي ممتاز بسعر مخفض! فرصة رائعة للحصول على أضحية عالية الجودة بسعر مناسب.",
            "isFeatured": false
        },
        {
            "name": "خروف روماني اقتصادي",
            "category": "روماني",
            "price": 85000,
            "images": [
                "https://images.unsplash.com/photo-1559827260-dc66d52bef19?w=800&h=800&fit=crop"
            ],
            "age": "سنة",
            "weight": "55 كجم",
            "breed": "روماني",
            "healthStatus": "جيد",
            "description": "خروف روماني مناسب للميزانيات المحدودة، صحة جيدة وجودة مضمونة.",
            "isFeatured": false
        },
        {
            "name": "خروف محلي فاخر - اختيار المربين",
            "category": "محلي",
            "price": 150000,
            "images": [
                "https://images.unsplash.com/photo-1567416220050-68a8fdc9e1f4?w=800&h=800&fit=crop",
                "https://images.unsplash.com/photo-1581579438747-27d445775bf0?w=800&h=800&fit=crop",
                "https://images.unsplash.com/photo-1543637005-6ee5f9656280?w=800&h=800&fit=crop"
            ],
            "age": "3 سنوات",
            "weight": "95 كجم",
            "breed": "النعيمي",
            "healthStatus": "ممتاز - فحص شامل",
            "description": "خروف نعيمي محلي فاخر من أجود السلالات، وزن استثنائي وصحة ممتازة. مثالي لمن يبحث عن الأفضل.",
            "isFeatured": true
        }
    ]))?;

    drafts
        .into_iter()
        .map(|draft| draft.validate().map_err(CommandError::from))
        .collect()
}

/// Insert the sample catalogue into `store`.
///
/// Does nothing when listings already exist, unless `force` is set.
///
/// # Errors
///
/// Returns an error if a sample fails validation or the store fails.
pub async fn seed_catalogue<S: SheepStore>(
    store: &S,
    force: bool,
) -> Result<SeedOutcome, CommandError> {
    let existing = store.list_sheep().await?.len();
    if existing > 0 && !force {
        return Ok(SeedOutcome::Skipped { existing });
    }

    let samples = sample_catalogue()?;
    let count = samples.len();
    for sheep in samples {
        let created = store.create_sheep(sheep).await?;
        tracing::debug!(sheep_id = %created.id, name = %created.name, "Sample sheep inserted");
    }
    Ok(SeedOutcome::Inserted(count))
}

/// Seed the configured database.
///
/// # Errors
///
/// Returns an error if the database is unreachable or seeding fails.
pub async fn run(force: bool) -> Result<(), CommandError> {
    let (_, store) = connect().await?;

    match seed_catalogue(&store, force).await? {
        SeedOutcome::Inserted(count) => tracing::info!("Seeding complete! Listings inserted: {count}"),
        SeedOutcome::Skipped { existing } => tracing::warn!(
            "Catalogue already has {existing} listings, nothing inserted (use --force to add anyway)"
        ),
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use kabsh_api::store::MemoryStore;
    use kabsh_core::SheepCategory;

    use super::*;

    #[test]
    fn test_samples_pass_validation() {
        let samples = sample_catalogue().unwrap();
        assert_eq!(samples.len(), 6);
        assert!(samples.iter().all(|s| !s.image_ids.is_empty()));
        assert_eq!(
            samples
                .iter()
                .filter(|s| s.category == SheepCategory::Local)
                .count(),
            3
        );
    }

    #[tokio::test]
    async fn test_seed_skips_non_empty_catalogue() {
        let store = MemoryStore::new();
        assert_eq!(
            seed_catalogue(&store, false).await.unwrap(),
            SeedOutcome::Inserted(6)
        );
        assert_eq!(
            seed_catalogue(&store, false).await.unwrap(),
            SeedOutcome::Skipped { existing: 6 }
        );
        assert_eq!(
            seed_catalogue(&store, true).await.unwrap(),
            SeedOutcome::Inserted(6)
        );
        assert_eq!(store.list_sheep().await.unwrap().len(), 12);
    }
}
