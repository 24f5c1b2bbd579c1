//! Status and classification enums for catalog, order and account entities.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a known enum value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct UnknownVariant {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Order lifecycle status.
///
/// ```text
/// pending ──► processing ──► completed
///    │             │
///    └──────► cancelled ◄────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Processing,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Arabic label shown to admins.
    #[must_use]
    pub const fn label_ar(self) -> &'static str {
        match self {
            Self::Pending => "قيد الانتظار",
            Self::Processing => "قيد المعالجة",
            Self::Completed => "مكتمل",
            Self::Cancelled => "ملغي",
        }
    }

    /// Whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether an order may move from `self` to `next`.
    ///
    /// Re-applying the current status is accepted as a no-op.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Pending | Self::Processing | Self::Cancelled)
                | (
                    Self::Processing,
                    Self::Processing | Self::Completed | Self::Cancelled
                )
                | (Self::Completed, Self::Completed)
                | (Self::Cancelled, Self::Cancelled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("order status", s))
    }
}

/// Admin role.
///
/// There is exactly one primary admin (the configured bootstrap admin); every
/// stored admin is secondary unless seeded otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "admin_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// The bootstrap admin. Cannot be removed through the API.
    Primary,
    /// Admins added by the primary admin.
    #[default]
    Secondary,
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
        }
    }
}

impl FromStr for AdminRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" => Ok(Self::Primary),
            "secondary" => Ok(Self::Secondary),
            _ => Err(UnknownVariant::new("admin role", s)),
        }
    }
}

/// Kind of storefront account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_type", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    #[default]
    Buyer,
    Seller,
    Admin,
    Guest,
}

impl UserType {
    /// Wire name of the account kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Seller => "seller",
            Self::Admin => "admin",
            Self::Guest => "guest",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer" => Ok(Self::Buyer),
            "seller" => Ok(Self::Seller),
            "admin" => Ok(Self::Admin),
            "guest" => Ok(Self::Guest),
            _ => Err(UnknownVariant::new("user type", s)),
        }
    }
}

/// Sheep category. Serialized with the Arabic labels the storefront uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(type_name = "sheep_category"))]
pub enum SheepCategory {
    /// Locally raised.
    #[serde(rename = "محلي")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "محلي"))]
    Local,
    /// Imported from Romania.
    #[serde(rename = "روماني")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "روماني"))]
    Romanian,
    /// Imported from Spain.
    #[serde(rename = "إسباني")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "إسباني"))]
    Spanish,
}

impl SheepCategory {
    /// All categories.
    pub const ALL: [Self; 3] = [Self::Local, Self::Romanian, Self::Spanish];

    /// Arabic label (also the wire value).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Local => "محلي",
            Self::Romanian => "روماني",
            Self::Spanish => "إسباني",
        }
    }

    /// Whether the breed is imported.
    #[must_use]
    pub const fn is_foreign(self) -> bool {
        matches!(self, Self::Romanian | Self::Spanish)
    }
}

impl fmt::Display for SheepCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SheepCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label() == s)
            .ok_or_else(|| UnknownVariant::new("sheep category", s))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_forward_transitions() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Processing));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Processing.can_transition_to(Completed));
        assert!(Processing.can_transition_to(Cancelled));
    }

    #[test]
    fn test_order_status_rejects_skips_and_reversals() {
        use OrderStatus::*;
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Processing.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Processing));
    }

    #[test]
    fn test_order_status_same_status_is_noop() {
        for status in OrderStatus::ALL {
            assert!(status.can_transition_to(status));
        }
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
    }

    #[test]
    fn test_order_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Processing).unwrap(),
            "\"processing\""
        );
        assert_eq!("cancelled".parse::<OrderStatus>(), Ok(OrderStatus::Cancelled));
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_category_uses_arabic_labels() {
        assert_eq!(
            serde_json::to_string(&SheepCategory::Local).unwrap(),
            "\"محلي\""
        );
        let parsed: SheepCategory = serde_json::from_str("\"إسباني\"").unwrap();
        assert_eq!(parsed, SheepCategory::Spanish);
        assert!(parsed.is_foreign());
        assert!("ram".parse::<SheepCategory>().is_err());
    }

    #[test]
    fn test_admin_role_defaults_to_secondary() {
        assert_eq!(AdminRole::default(), AdminRole::Secondary);
        assert_eq!("primary".parse::<AdminRole>(), Ok(AdminRole::Primary));
    }
}
