//! Order rules.

use core::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::{Validated, ValidationError, double_option, optional_text, required_text};
use crate::locations::get_wilaya_by_code;
use crate::models::{Order, OrderItem};
use crate::types::{ImageRef, OrderStatus, SheepId};

const MIN_PHONE_CHARS: usize = 10;

/// Raw line item.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderItemDraft {
    /// Either a JSON number or a numeric string.
    pub sheep_id: Option<serde_json::Value>,
    pub sheep_name: Option<String>,
    #[serde(alias = "sheepImage")]
    pub sheep_image_id: Option<ImageRef>,
    pub price: Option<Decimal>,
    pub quantity: Option<i64>,
}

/// Raw order input.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderDraft {
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub user_phone: Option<String>,
    pub wilaya_code: Option<String>,
    pub wilaya_name: Option<String>,
    pub commune_id: Option<i64>,
    pub commune_name: Option<String>,
    pub items: Option<Vec<OrderItemDraft>>,
    /// Either a JSON number or a numeric string.
    pub total_amount: Option<serde_json::Value>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// An order that passed validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub user_id: Option<String>,
    pub user_name: String,
    pub user_phone: String,
    pub wilaya_code: String,
    pub wilaya_name: String,
    pub commune_id: i32,
    pub commune_name: String,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub notes: Option<String>,
}

/// Raw order update from the back-office.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderPatch {
    pub status: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

/// Validated changes to an existing order. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub notes: Option<Option<String>>,
}

impl OrderUpdate {
    /// Whether applying this update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none() && self.notes.is_none()
    }
}

fn parse_status(raw: &str) -> Validated<OrderStatus> {
    OrderStatus::from_str(raw.trim())
        .map_err(|_| ValidationError::new("status", "حالة الطلب غير صالحة"))
}

fn parse_sheep_id(value: &serde_json::Value) -> Option<SheepId> {
    let raw = match value {
        serde_json::Value::Number(n) => n.as_i64()?,
        serde_json::Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    i32::try_from(raw).ok().filter(|id| *id >= 1).map(SheepId::new)
}

fn parse_amount(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        serde_json::Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

impl OrderItemDraft {
    fn validate(self, index: usize) -> Validated<OrderItem> {
        let field = |name: &str| format!("items[{index}].{name}");

        let sheep_id = self
            .sheep_id
            .as_ref()
            .and_then(parse_sheep_id)
            .ok_or_else(|| ValidationError::new(field("sheepId"), "معرف المنتج مطلوب"))?;

        let price = self
            .price
            .filter(|p| !p.is_sign_negative())
            .ok_or_else(|| ValidationError::new(field("price"), "سعر المنتج غير صالح"))?;

        let quantity = self
            .quantity
            .filter(|q| *q >= 1)
            .and_then(|q| u32::try_from(q).ok())
            .ok_or_else(|| {
                ValidationError::new(field("quantity"), "الكمية يجب أن تكون 1 على الأقل")
            })?;

        Ok(OrderItem {
            sheep_id,
            sheep_name: self.sheep_name.unwrap_or_default().trim().to_owned(),
            sheep_image: self.sheep_image_id,
            price,
            quantity,
        })
    }
}

impl OrderDraft {
    /// Validate a new order.
    ///
    /// # Errors
    ///
    /// Returns the first failing field.
    pub fn validate(self) -> Validated<NewOrder> {
        let user_name = required_text(self.user_name, "userName", "الاسم مطلوب")?;

        let user_phone = self.user_phone.unwrap_or_default().trim().to_owned();
        if user_phone.chars().count() < MIN_PHONE_CHARS {
            return Err(ValidationError::new("userPhone", "رقم الهاتف غير صالح"));
        }

        let wilaya_code = required_text(self.wilaya_code, "wilayaCode", "الولاية مطلوبة")?;
        let wilaya_name = required_text(self.wilaya_name, "wilayaName", "الولاية مطلوبة")?;
        if get_wilaya_by_code(&wilaya_code).is_none() {
            return Err(ValidationError::new("wilayaCode", "الولاية غير صالحة"));
        }

        let commune_id = self
            .commune_id
            .filter(|id| *id >= 1)
            .and_then(|id| i32::try_from(id).ok())
            .ok_or_else(|| ValidationError::new("communeId", "البلدية مطلوبة"))?;
        let commune_name = required_text(self.commune_name, "communeName", "البلدية مطلوبة")?;

        let drafts = self.items.unwrap_or_default();
        if drafts.is_empty() {
            return Err(ValidationError::new(
                "items",
                "يجب إضافة منتج واحد على الأقل",
            ));
        }
        let items = drafts
            .into_iter()
            .enumerate()
            .map(|(index, item)| item.validate(index))
            .collect::<Validated<Vec<_>>>()?;

        let total_amount = self
            .total_amount
            .as_ref()
            .and_then(parse_amount)
            .filter(|amount| !amount.is_sign_negative())
            .ok_or_else(|| ValidationError::new("totalAmount", "المبلغ غير صالح"))?;

        let status = self
            .status
            .as_deref()
            .map(parse_status)
            .transpose()?
            .unwrap_or_default();

        Ok(NewOrder {
            user_id: optional_text(self.user_id),
            user_name,
            user_phone,
            wilaya_code,
            wilaya_name,
            commune_id,
            commune_name,
            items,
            total_amount,
            status,
            notes: optional_text(self.notes),
        })
    }
}

impl OrderPatch {
    /// Validate an update against the order's current state.
    ///
    /// Setting the status the order already has is accepted and changes
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown status or a transition the order
    /// lifecycle does not allow.
    pub fn validate(self, current: &Order) -> Validated<OrderUpdate> {
        let status = match self.status.as_deref() {
            None => None,
            Some(raw) => {
                let next = parse_status(raw)?;
                if !current.status.can_transition_to(next) {
                    return Err(ValidationError::new(
                        "status",
                        format!(
                            "لا يمكن تغيير حالة الطلب من {} إلى {}",
                            current.status.label_ar(),
                            next.label_ar()
                        ),
                    ));
                }
                (next != current.status).then_some(next)
            }
        };

        Ok(OrderUpdate {
            status,
            notes: self.notes.map(optional_text),
        })
    }
}
