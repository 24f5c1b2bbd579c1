//! ImgBB image host client.
//!
//! Uploads base64 payloads to `https://api.imgbb.com/1/upload` and returns
//! the hosted URLs.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, instrument};

use kabsh_core::validation::ImageUpload;

/// ImgBB upload endpoint.
const UPLOAD_URL: &str = "https://api.imgbb.com/1/upload";

/// Outbound request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Message used when the host gives no reason.
const DEFAULT_FAILURE: &str = "فشل في رفع الصورة إلى ImgBB";

/// Errors that can occur when uploading to the image host.
#[derive(Debug, Error)]
pub enum ImageHostError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Host rejected the upload. `message` comes from the host.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Host answered 2xx without a usable payload.
    #[error("فشل في رفع الصورة إلى ImgBB")]
    Rejected,
}

impl ImageHostError {
    /// Text safe to show to the client.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Http(_) => "فشل في رفع الصورة".to_owned(),
            Self::Api { message, .. } => message.clone(),
            Self::Rejected => DEFAULT_FAILURE.to_owned(),
        }
    }
}

/// URLs of an uploaded picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedImage {
    pub url: String,
    /// Falls back to `url` when the host made no thumbnail.
    pub thumbnail_url: String,
    pub delete_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    data: Option<UploadData>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    url: String,
    thumb: Option<Thumb>,
    delete_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Thumb {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// ImgBB API client.
#[derive(Clone)]
pub struct ImgBbClient {
    client: reqwest::Client,
    api_key: SecretString,
}

impl ImgBbClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(api_key: SecretString) -> Result<Self, ImageHostError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, api_key })
    }

    /// Upload a validated image.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the host rejects the upload.
    #[instrument(skip(self, upload), fields(mime_type = %upload.mime_type, bytes = upload.byte_len))]
    pub async fn upload(&self, upload: &ImageUpload) -> Result<HostedImage, ImageHostError> {
        let mut form: Vec<(&str, &str)> = vec![
            ("key", self.api_key.expose_secret()),
            ("image", upload.base64.as_str()),
        ];
        if let Some(name) = upload.original_file_name.as_deref() {
            form.push(("name", name));
        }

        let response = self.client.post(UPLOAD_URL).form(&form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        parse_upload_response(status.as_u16(), &body).inspect_err(|e| {
            error!(status = status.as_u16(), error = %e, "ImgBB upload failed");
        })
    }
}

/// Interpret an upload response body.
fn parse_upload_response(status: u16, body: &str) -> Result<HostedImage, ImageHostError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|r| r.error)
            .and_then(|e| e.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FAILURE.to_owned());
        return Err(ImageHostError::Api { status, message });
    }

    let parsed: UploadResponse =
        serde_json::from_str(body).map_err(|_| ImageHostError::Rejected)?;
    match parsed {
        UploadResponse {
            success: true,
            data: Some(data),
        } => Ok(HostedImage {
            thumbnail_url: data.thumb.map_or_else(|| data.url.clone(), |t| t.url),
            url: data.url,
            delete_url: data.delete_url,
        }),
        _ => Err(ImageHostError::Rejected),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success() {
        let body = r#"{
            "data": {
                "id": "2ndCYJK",
                "url": "https://i.ibb.co/w04Prt6/c1f64245afb2.gif",
                "display_url": "https://i.ibb.co/98W13PY/c1f64245afb2.gif",
                "thumb": {"url": "https://i.ibb.co/2ndCYJK/c1f64245afb2.gif"},
                "delete_url": "https://ibb.co/2ndCYJK/670a7e48ddcb85ac340c717a41047e5c"
            },
            "success": true,
            "status": 200
        }"#;
        let hosted = parse_upload_response(200, body).unwrap();
        assert_eq!(hosted.url, "https://i.ibb.co/w04Prt6/c1f64245afb2.gif");
        assert_eq!(hosted.thumbnail_url, "https://i.ibb.co/2ndCYJK/c1f64245afb2.gif");
        assert!(hosted.delete_url.is_some());
    }

    #[test]
    fn test_thumbnail_falls_back_to_url() {
        let body = r#"{"data": {"url": "https://i.ibb.co/x/a.png"}, "success": true}"#;
        let hosted = parse_upload_response(200, body).unwrap();
        assert_eq!(hosted.thumbnail_url, hosted.url);
    }

    #[test]
    fn test_host_error_message_passed_through() {
        let body = r#"{"status_code": 400, "error": {"message": "Invalid API v1 key.", "code": 100}, "status_txt": "Bad Request"}"#;
        let err = parse_upload_response(400, body).unwrap_err();
        assert!(matches!(err, ImageHostError::Api { status: 400, .. }));
        assert_eq!(err.client_message(), "Invalid API v1 key.");
    }

    #[test]
    fn test_unparseable_error_uses_default() {
        let err = parse_upload_response(502, "<html>Bad Gateway</html>").unwrap_err();
        assert_eq!(err.client_message(), DEFAULT_FAILURE);
    }

    #[test]
    fn test_success_false_is_rejected() {
        let err = parse_upload_response(200, r#"{"success": false}"#).unwrap_err();
        assert!(matches!(err, ImageHostError::Rejected));
    }
}
