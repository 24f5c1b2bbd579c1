//! User profile rules.

use serde::Deserialize;

use super::{Validated, ValidationError, double_option, optional_text};
use crate::models::UserProfile;
use crate::types::{Email, UserType};

/// Raw profile input, used for both create-or-replace and PATCH.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfileDraft {
    #[serde(deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub display_name: Option<Option<String>>,
    #[serde(rename = "photoURL", alias = "photoUrl", deserialize_with = "double_option")]
    pub photo_url: Option<Option<String>>,
    pub user_type: Option<String>,
}

/// A validated profile ready to be upserted under `uid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserProfile {
    pub uid: String,
    pub email: Option<Email>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub user_type: UserType,
}

impl From<&UserProfile> for UserProfileDraft {
    fn from(profile: &UserProfile) -> Self {
        Self {
            email: Some(profile.email.as_ref().map(|e| e.as_str().to_owned())),
            display_name: Some(profile.display_name.clone()),
            photo_url: Some(profile.photo_url.clone()),
            user_type: Some(profile.user_type.as_str().to_owned()),
        }
    }
}

impl UserProfileDraft {
    /// Overlay the fields present in `patch` on top of `self`.
    #[must_use]
    pub fn merge(self, patch: Self) -> Self {
        Self {
            email: patch.email.or(self.email),
            display_name: patch.display_name.or(self.display_name),
            photo_url: patch.photo_url.or(self.photo_url),
            user_type: patch.user_type.or(self.user_type),
        }
    }

    /// Validate a full profile for `uid`.
    ///
    /// # Errors
    ///
    /// Returns the first failing field.
    pub fn validate(self, uid: &str) -> Validated<NewUserProfile> {
        let uid = uid.trim();
        if uid.is_empty() {
            return Err(ValidationError::new("uid", "معرف المستخدم مطلوب"));
        }

        let email = optional_text(self.email.flatten())
            .map(|raw| Email::parse(&raw))
            .transpose()
            .map_err(|_| ValidationError::new("email", "البريد الإلكتروني غير صالح"))?;

        let photo_url = optional_text(self.photo_url.flatten());
        if let Some(raw) = &photo_url
            && !url::Url::parse(raw).is_ok_and(|u| u.has_host())
        {
            return Err(ValidationError::new("photoURL", "رابط الصورة غير صالح"));
        }

        let user_type = self
            .user_type
            .as_deref()
            .and_then(|t| t.trim().parse::<UserType>().ok())
            .ok_or_else(|| ValidationError::new("userType", "نوع المستخدم غير صالح"))?;

        Ok(NewUserProfile {
            uid: uid.to_owned(),
            email,
            display_name: optional_text(self.display_name.flatten()),
            photo_url,
            user_type,
        })
    }
}
