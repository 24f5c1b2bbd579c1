//! References from a sheep listing to its pictures.

use core::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ImageId;

/// A reference to a picture: either a ready-to-display URL or the id of a
/// stored [`Image`](crate::models::Image) record.
///
/// On the wire a URL is a JSON string and an id is a JSON number. Numeric
/// strings (`"12"`) are accepted as ids for clients that stringify everything.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageRef {
    /// Absolute `http(s)` URL or `data:` URL, passed through as-is.
    Url(String),
    /// Id of a stored image record, resolved on read.
    Id(ImageId),
}

/// Why a string could not be read as an [`ImageRef`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid image reference: {0}")]
pub struct InvalidImageRef(pub String);

impl ImageRef {
    /// Parse a textual reference.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidImageRef`] for anything that is neither an integer id
    /// nor an `http`, `https` or `data` URL.
    pub fn parse(raw: &str) -> Result<Self, InvalidImageRef> {
        let trimmed = raw.trim();
        if let Ok(id) = trimmed.parse::<ImageId>() {
            return Ok(Self::Id(id));
        }

        match url::Url::parse(trimmed) {
            Ok(url) if matches!(url.scheme(), "http" | "https" | "data") => {
                Ok(Self::Url(trimmed.to_owned()))
            }
            _ => Err(InvalidImageRef(raw.to_owned())),
        }
    }

    /// The URL if this reference needs no lookup.
    #[must_use]
    pub fn as_url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            Self::Id(_) => None,
        }
    }

    /// The image id if this reference points at a stored record.
    #[must_use]
    pub const fn as_id(&self) -> Option<ImageId> {
        match self {
            Self::Url(_) => None,
            Self::Id(id) => Some(*id),
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

impl From<ImageId> for ImageRef {
    fn from(id: ImageId) -> Self {
        Self::Id(id)
    }
}

impl Serialize for ImageRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Url(url) => serializer.serialize_str(url),
            Self::Id(id) => serializer.serialize_i32(id.as_i32()),
        }
    }
}

impl<'de> Deserialize<'de> for ImageRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ImageRefVisitor;

        impl Visitor<'_> for ImageRefVisitor {
            type Value = ImageRef;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an image URL or a numeric image id")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                i32::try_from(v)
                    .map(|id| ImageRef::Id(ImageId::new(id)))
                    .map_err(|_| E::custom(format!("image id out of range: {v}")))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                i32::try_from(v)
                    .map(|id| ImageRef::Id(ImageId::new(id)))
                    .map_err(|_| E::custom(format!("image id out of range: {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                ImageRef::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(ImageRefVisitor)
    }
}
