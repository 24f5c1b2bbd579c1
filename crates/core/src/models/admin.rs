//! Stored admin accounts.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{AdminId, AdminRole, Email};

/// A stored admin row.
///
/// The configured bootstrap admin is never stored; see the admin directory in
/// the API crate for how the two are combined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: AdminId,
    pub email: Email,
    pub role: AdminRole,
    pub added_at: DateTime<Utc>,
}
