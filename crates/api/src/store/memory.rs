//! In-process store.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use kabsh_core::models::{Admin, Image, NewImage, Order, Sheep, UserProfile};
use kabsh_core::validation::{NewAdmin, NewOrder, NewSheep, NewUserProfile, OrderUpdate};
use kabsh_core::{AdminId, Email, ImageId, ImageRef, OrderId, OrderStatus, SheepId};
use tokio::sync::RwLock;

use super::{
    AdminStore, ImageStore, OrderStore, RepositoryError, SheepStore, Store, UserStore,
};

/// Document store held in memory behind a single lock.
///
/// One lock for all tables keeps multi-table writes such as
/// [`SheepStore::create_sheep_with_images`] atomic.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

#[derive(Default)]
struct Tables {
    sheep: BTreeMap<SheepId, Sheep>,
    orders: BTreeMap<OrderId, Order>,
    images: BTreeMap<ImageId, Image>,
    admins: BTreeMap<AdminId, Admin>,
    users: HashMap<String, UserProfile>,
    seq: Sequences,
}

#[derive(Default)]
struct Sequences {
    sheep: i32,
    order: i32,
    image: i32,
    admin: i32,
}

fn next(counter: &mut i32) -> Result<i32, RepositoryError> {
    *counter = counter
        .checked_add(1)
        .ok_or_else(|| RepositoryError::DataCorruption("id sequence exhausted".to_owned()))?;
    Ok(*counter)
}

fn build_sheep(id: SheepId, new: NewSheep, created_at: DateTime<Utc>) -> Sheep {
    Sheep {
        id,
        name: new.name,
        category: new.category,
        price: new.price,
        discount_percentage: new.discount_percentage,
        image_ids: new.image_ids,
        age: new.age,
        weight: new.weight,
        breed: new.breed,
        health_status: new.health_status,
        description: new.description,
        is_featured: new.is_featured,
        created_at,
        updated_at: Utc::now(),
    }
}

impl Tables {
    fn insert_image(&mut self, new: NewImage) -> Result<Image, RepositoryError> {
        let id = ImageId::new(next(&mut self.seq.image)?);
        let image = Image::from_new(id, new, Utc::now());
        self.images.insert(id, image.clone());
        Ok(image)
    }

    fn insert_sheep(&mut self, new: NewSheep) -> Result<Sheep, RepositoryError> {
        let id = SheepId::new(next(&mut self.seq.sheep)?);
        let sheep = build_sheep(id, new, Utc::now());
        self.sheep.insert(id, sheep.clone());
        Ok(sheep)
    }
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SheepStore for MemoryStore {
    async fn list_sheep(&self) -> Result<Vec<Sheep>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut sheep: Vec<Sheep> = tables.sheep.values().cloned().collect();
        sheep.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(sheep)
    }

    async fn get_sheep(&self, id: SheepId) -> Result<Option<Sheep>, RepositoryError> {
        Ok(self.tables.read().await.sheep.get(&id).cloned())
    }

    async fn create_sheep(&self, sheep: NewSheep) -> Result<Sheep, RepositoryError> {
        self.tables.write().await.insert_sheep(sheep)
    }

    async fn create_sheep_with_images(
        &self,
        mut sheep: NewSheep,
        images: Vec<NewImage>,
    ) -> Result<(Sheep, Vec<Image>), RepositoryError> {
        let mut tables = self.tables.write().await;
        let mut created = Vec::with_capacity(images.len());
        for new in images {
            let image = tables.insert_image(new)?;
            sheep.image_ids.push(ImageRef::Id(image.id));
            created.push(image);
        }
        let sheep = tables.insert_sheep(sheep)?;
        Ok((sheep, created))
    }

    async fn update_sheep(&self, id: SheepId, sheep: NewSheep) -> Result<Sheep, RepositoryError> {
        let mut tables = self.tables.write().await;
        let existing = tables.sheep.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        *existing = build_sheep(id, sheep, existing.created_at);
        Ok(existing.clone())
    }

    async fn delete_sheep(&self, id: SheepId) -> Result<(), RepositoryError> {
        self.tables
            .write()
            .await
            .sheep
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

impl OrderStore for MemoryStore {
    async fn list_orders(
        &self,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut orders: Vec<Order> = tables
            .orders
            .values()
            .filter(|o| status.is_none_or(|s| o.status == s))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        Ok(self.tables.read().await.orders.get(&id).cloned())
    }

    async fn create_order(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        let mut tables = self.tables.write().await;
        let id = OrderId::new(next(&mut tables.seq.order)?);
        let now = Utc::now();
        let order = Order {
            id,
            user_id: order.user_id,
            user_name: order.user_name,
            user_phone: order.user_phone,
            wilaya_code: order.wilaya_code,
            wilaya_name: order.wilaya_name,
            commune_id: order.commune_id,
            commune_name: order.commune_name,
            items: order.items,
            total_amount: order.total_amount,
            status: order.status,
            notes: order.notes,
            created_at: now,
            updated_at: now,
        };
        tables.orders.insert(id, order.clone());
        Ok(order)
    }

    async fn update_order(
        &self,
        id: OrderId,
        expected: OrderStatus,
        update: OrderUpdate,
    ) -> Result<Order, RepositoryError> {
        let mut tables = self.tables.write().await;
        let order = tables.orders.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        if order.status != expected {
            return Err(RepositoryError::Conflict(format!(
                "order status is {}, expected {expected}",
                order.status
            )));
        }
        if let Some(status) = update.status {
            order.status = status;
        }
        if let Some(notes) = update.notes {
            order.notes = notes;
        }
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn delete_order(&self, id: OrderId) -> Result<(), RepositoryError> {
        self.tables
            .write()
            .await
            .orders
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

impl ImageStore for MemoryStore {
    async fn create_image(&self, image: NewImage) -> Result<Image, RepositoryError> {
        self.tables.write().await.insert_image(image)
    }

    async fn get_image(&self, id: ImageId) -> Result<Option<Image>, RepositoryError> {
        Ok(self.tables.read().await.images.get(&id).cloned())
    }
}

impl AdminStore for MemoryStore {
    async fn list_admins(&self) -> Result<Vec<Admin>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut admins: Vec<Admin> = tables.admins.values().cloned().collect();
        admins.sort_by(|a, b| a.added_at.cmp(&b.added_at).then(a.id.cmp(&b.id)));
        Ok(admins)
    }

    async fn get_admin(&self, id: AdminId) -> Result<Option<Admin>, RepositoryError> {
        Ok(self.tables.read().await.admins.get(&id).cloned())
    }

    async fn get_admin_by_email(&self, email: &Email) -> Result<Option<Admin>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .await
            .admins
            .values()
            .find(|a| &a.email == email)
            .cloned())
    }

    async fn create_admin(&self, admin: NewAdmin) -> Result<Admin, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.admins.values().any(|a| a.email == admin.email) {
            return Err(RepositoryError::Conflict("admin email already exists".to_owned()));
        }
        let id = AdminId::new(next(&mut tables.seq.admin)?);
        let admin = Admin {
            id,
            email: admin.email,
            role: admin.role,
            added_at: Utc::now(),
        };
        tables.admins.insert(id, admin.clone());
        Ok(admin)
    }

    async fn delete_admin(&self, id: AdminId) -> Result<(), RepositoryError> {
        self.tables
            .write()
            .await
            .admins
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

impl UserStore for MemoryStore {
    async fn get_user(&self, uid: &str) -> Result<Option<UserProfile>, RepositoryError> {
        Ok(self.tables.read().await.users.get(uid).cloned())
    }

    async fn upsert_user(&self, profile: NewUserProfile) -> Result<UserProfile, RepositoryError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let created_at = tables
            .users
            .get(&profile.uid)
            .map_or(now, |existing| existing.created_at);
        let user = UserProfile {
            uid: profile.uid,
            email: profile.email,
            display_name: profile.display_name,
            photo_url: profile.photo_url,
            user_type: profile.user_type,
            created_at,
            updated_at: now,
        };
        tables.users.insert(user.uid.clone(), user.clone());
        Ok(user)
    }
}

impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
