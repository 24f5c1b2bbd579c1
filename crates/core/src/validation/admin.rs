//! Admin rules.

use serde::Deserialize;

use super::{Validated, ValidationError};
use crate::types::{AdminRole, Email};

/// Raw admin input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminDraft {
    pub email: Option<String>,
    pub role: Option<String>,
}

/// A validated admin, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAdmin {
    pub email: Email,
    pub role: AdminRole,
}

impl AdminDraft {
    /// Validate an admin to be added.
    ///
    /// Only secondary admins can be stored; the primary admin comes from
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed email or a role other than secondary.
    pub fn validate(self) -> Validated<NewAdmin> {
        let email = self
            .email
            .as_deref()
            .and_then(|e| Email::parse(e).ok())
            .ok_or_else(|| ValidationError::new("email", "البريد الإلكتروني غير صالح"))?;

        let role = match self.role.as_deref().map(str::trim) {
            None | Some("") => AdminRole::default(),
            Some(raw) => raw
                .parse::<AdminRole>()
                .map_err(|_| ValidationError::new("role", "الدور غير صالح"))?,
        };
        if role == AdminRole::Primary {
            return Err(ValidationError::new("role", "لا يمكن إضافة مدير رئيسي"));
        }

        Ok(NewAdmin { email, role })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft(email: &str, role: Option<&str>) -> AdminDraft {
        AdminDraft {
            email: Some(email.to_owned()),
            role: role.map(str::to_owned),
        }
    }

    #[test]
    fn test_defaults_to_secondary_and_normalizes() {
        let admin = draft(" Ali@Example.COM ", None).validate().unwrap();
        assert_eq!(admin.email.as_str(), "ali@example.com");
        assert_eq!(admin.role, AdminRole::Secondary);
    }

    #[test]
    fn test_rejects_bad_email() {
        let err = draft("not-an-email", None).validate().unwrap_err();
        assert_eq!(err.field, "email");
        assert_eq!(err.message, "البريد الإلكتروني غير صالح");
        assert!(AdminDraft::default().validate().is_err());
    }

    #[test]
    fn test_rejects_primary_and_unknown_roles() {
        assert_eq!(
            draft("a@b.dz", Some("primary")).validate().unwrap_err().field,
            "role"
        );
        assert_eq!(
            draft("a@b.dz", Some("owner")).validate().unwrap_err().message,
            "الدور غير صالح"
        );
    }
}
