//! Image upload rules.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

use super::{Validated, ValidationError, optional_text};

/// Largest accepted decoded upload, in bytes.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Accepted MIME types, lowercase.
pub const SUPPORTED_IMAGE_TYPES: [&str; 6] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/bmp",
];

/// Raw upload body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageUploadDraft {
    /// Base64 payload, optionally prefixed with `data:image/...;base64,`.
    pub image_data: Option<String>,
    pub mime_type: Option<String>,
    pub original_file_name: Option<String>,
}

/// A checked upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Base64 payload without any data-URL prefix.
    pub base64: String,
    /// Lowercased MIME type from the allow-list.
    pub mime_type: String,
    pub original_file_name: Option<String>,
    /// Decoded size in bytes.
    pub byte_len: usize,
}

fn strip_data_url_prefix(data: &str) -> &str {
    if data.starts_with("data:")
        && let Some((_, payload)) = data.split_once(";base64,")
    {
        return payload;
    }
    data
}

impl ImageUploadDraft {
    /// Validate an upload.
    ///
    /// # Errors
    ///
    /// Returns an error for missing data, a MIME type outside
    /// [`SUPPORTED_IMAGE_TYPES`], undecodable base64, or a payload larger than
    /// [`MAX_IMAGE_BYTES`].
    pub fn validate(self) -> Validated<ImageUpload> {
        let data = self.image_data.as_deref().map(str::trim).unwrap_or_default();
        let mime_type = self
            .mime_type
            .as_deref()
            .map(|m| m.trim().to_ascii_lowercase())
            .unwrap_or_default();
        if data.is_empty() || mime_type.is_empty() {
            return Err(ValidationError::new("imageData", "بيانات الصورة مطلوبة"));
        }

        if !SUPPORTED_IMAGE_TYPES.contains(&mime_type.as_str()) {
            return Err(ValidationError::new("mimeType", "نوع الصورة غير مدعوم"));
        }

        let payload = strip_data_url_prefix(data);
        let bytes = STANDARD
            .decode(payload)
            .map_err(|_| ValidationError::new("imageData", "بيانات الصورة غير صالحة"))?;
        if bytes.is_empty() {
            return Err(ValidationError::new("imageData", "بيانات الصورة غير صالحة"));
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ValidationError::new(
                "imageData",
                "حجم الصورة يتجاوز 10 ميغابايت",
            ));
        }

        Ok(ImageUpload {
            base64: payload.to_owned(),
            mime_type,
            original_file_name: optional_text(self.original_file_name),
            byte_len: bytes.len(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft(data: &str, mime: &str) -> ImageUploadDraft {
        ImageUploadDraft {
            image_data: Some(data.to_owned()),
            mime_type: Some(mime.to_owned()),
            original_file_name: Some("kabsh.png".to_owned()),
        }
    }

    #[test]
    fn test_strips_data_url_prefix() {
        let upload = draft("data:image/png;base64,AAEC", "image/png")
            .validate()
            .unwrap();
        assert_eq!(upload.base64, "AAEC");
        assert_eq!(upload.byte_len, 3);
    }

    #[test]
    fn test_mime_is_case_insensitive() {
        let upload = draft("AAEC", "Image/JPEG").validate().unwrap();
        assert_eq!(upload.mime_type, "image/jpeg");
    }

    #[test]
    fn test_rejects_unsupported_mime() {
        let err = draft("AAEC", "image/svg+xml").validate().unwrap_err();
        assert_eq!(err.message, "نوع الصورة غير مدعوم");
    }

    #[test]
    fn test_rejects_missing_data() {
        let err = ImageUploadDraft::default().validate().unwrap_err();
        assert_eq!(err.message, "بيانات الصورة مطلوبة");
    }

    #[test]
    fn test_rejects_invalid_base64() {
        let err = draft("not base64!!", "image/png").validate().unwrap_err();
        assert_eq!(err.message, "بيانات الصورة غير صالحة");
    }

    #[test]
    fn test_rejects_oversized_payload() {
        let big = STANDARD.encode(vec![0_u8; MAX_IMAGE_BYTES + 1]);
        let err = draft(&big, "image/png").validate().unwrap_err();
        assert_eq!(err.message, "حجم الصورة يتجاوز 10 ميغابايت");
    }
}
