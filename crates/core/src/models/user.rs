//! Storefront account profiles.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{Email, UserType};

/// Profile of a user signed in through the external auth provider.
///
/// `uid` is the provider's identity; admin status is derived on read and is
/// not part of the stored profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    pub email: Option<Email>,
    pub display_name: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub user_type: UserType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
