//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `KABSH_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string,
//!   when `KABSH_STORE=postgres`
//! - `IMGBB_API_KEY` - image host key, when `KABSH_IMAGE_STORAGE=imgbb`
//!
//! ## Optional
//! - `KABSH_STORE` - `postgres` (default) or `memory`
//! - `KABSH_HOST` - Bind address (default: 127.0.0.1)
//! - `KABSH_PORT` - Listen port (default: 5000)
//! - `KABSH_IMAGE_STORAGE` - `inline` (default) or `imgbb`
//! - `KABSH_PRIMARY_ADMIN_EMAIL` - bootstrap admin, always privileged
//! - `KABSH_RESOLVED_IMAGE_CACHE_TTL_SECS` - resolver cache TTL (default: 600)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use kabsh_core::Email;
use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Which persistence adapter backs the API.
#[derive(Clone)]
pub enum StoreConfig {
    /// In-process store; data is lost on restart.
    Memory,
    /// `PostgreSQL` (connection URL contains the password).
    Postgres { database_url: SecretString },
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => f.write_str("Memory"),
            Self::Postgres { .. } => f
                .debug_struct("Postgres")
                .field("database_url", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Where uploaded image bytes go.
#[derive(Clone)]
pub enum ImageStorageConfig {
    /// Base64 payload kept in the store.
    Inline,
    /// Uploaded to ImgBB.
    ImgBb { api_key: SecretString },
}

impl std::fmt::Debug for ImageStorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inline => f.write_str("Inline"),
            Self::ImgBb { .. } => f
                .debug_struct("ImgBb")
                .field("api_key", &"[REDACTED]")
                .finish(),
        }
    }
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Persistence adapter
    pub store: StoreConfig,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Image upload destination
    pub image_storage: ImageStorageConfig,
    /// Bootstrap admin, privileged regardless of stored admins
    pub primary_admin_email: Option<Email>,
    /// How long resolved image URLs stay cached
    pub resolved_image_cache_ttl: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for ApiConfig {
    /// In-memory store, inline images, no bootstrap admin.
    fn default() -> Self {
        Self {
            store: StoreConfig::Memory,
            host: IpAddr::from([127, 0, 0, 1]),
            port: 5000,
            image_storage: ImageStorageConfig::Inline,
            primary_admin_email: None,
            resolved_image_cache_ttl: Duration::from_secs(600),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_vars(&|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`ApiConfig::from_env`].
    pub fn from_vars(vars: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(vars);

        let store = match env.or_default("KABSH_STORE", "postgres").as_str() {
            "memory" => StoreConfig::Memory,
            "postgres" => StoreConfig::Postgres {
                database_url: env.database_url("KABSH_DATABASE_URL")?,
            },
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "KABSH_STORE".to_string(),
                    format!("expected 'postgres' or 'memory', got '{other}'"),
                ));
            }
        };

        let host = env
            .or_default("KABSH_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("KABSH_HOST".to_string(), e.to_string()))?;
        let port = env
            .or_default("KABSH_PORT", "5000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("KABSH_PORT".to_string(), e.to_string()))?;

        let image_storage = match env.or_default("KABSH_IMAGE_STORAGE", "inline").as_str() {
            "inline" => ImageStorageConfig::Inline,
            "imgbb" => ImageStorageConfig::ImgBb {
                api_key: env.validated_secret("IMGBB_API_KEY")?,
            },
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "KABSH_IMAGE_STORAGE".to_string(),
                    format!("expected 'inline' or 'imgbb', got '{other}'"),
                ));
            }
        };

        let primary_admin_email = env
            .optional("KABSH_PRIMARY_ADMIN_EMAIL")
            .map(|raw| {
                Email::parse(&raw).map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "KABSH_PRIMARY_ADMIN_EMAIL".to_string(),
                        e.to_string(),
                    )
                })
            })
            .transpose()?;

        let ttl_secs = env
            .or_default("KABSH_RESOLVED_IMAGE_CACHE_TTL_SECS", "600")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar(
                    "KABSH_RESOLVED_IMAGE_CACHE_TTL_SECS".to_string(),
                    e.to_string(),
                )
            })?;

        Ok(Self {
            store,
            host,
            port,
            image_storage,
            primary_admin_email,
            resolved_image_cache_ttl: Duration::from_secs(ttl_secs),
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with the helpers the loaders share.
struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable. Blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key)
            .map_or_else(|| default.to_string(), |v| v.trim().to_string())
    }

    /// Get database URL with fallback to generic `DATABASE_URL`.
    fn database_url(&self, primary_key: &str) -> Result<SecretString, ConfigError> {
        self.optional(primary_key)
            .or_else(|| self.optional("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
    }

    /// Load and validate a secret.
    fn validated_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = self.required(key)?;
        validate_secret_strength(&value, key)?;
        Ok(SecretString::from(value))
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key issued by the image host."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const IMGBB_KEY: &str = "3f9a1c7e5b2d8046af1e9c3b7d5a2f80";

    fn load(pairs: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ApiConfig::from_vars(&|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_with_memory_store() {
        let config = load(&[("KABSH_STORE", "memory")]).unwrap();
        assert!(matches!(config.store, StoreConfig::Memory));
        assert!(matches!(config.image_storage, ImageStorageConfig::Inline));
        assert_eq!(config.port, 5000);
        assert_eq!(config.resolved_image_cache_ttl, Duration::from_secs(600));
        assert!(config.primary_admin_email.is_none());
    }

    #[test]
    fn test_postgres_requires_database_url() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "KABSH_DATABASE_URL"));
    }

    #[test]
    fn test_database_url_fallback() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/kabsh")]).unwrap();
        assert!(matches!(config.store, StoreConfig::Postgres { .. }));
    }

    #[test]
    fn test_unknown_store_rejected() {
        let err = load(&[("KABSH_STORE", "firestore")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_imgbb_requires_key() {
        let err = load(&[("KABSH_STORE", "memory"), ("KABSH_IMAGE_STORAGE", "imgbb")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "IMGBB_API_KEY"));

        let config = load(&[
            ("KABSH_STORE", "memory"),
            ("KABSH_IMAGE_STORAGE", "imgbb"),
            ("IMGBB_API_KEY", IMGBB_KEY),
        ])
        .unwrap();
        assert!(matches!(config.image_storage, ImageStorageConfig::ImgBb { .. }));
    }

    #[test]
    fn test_primary_admin_email_normalized() {
        let config = load(&[
            ("KABSH_STORE", "memory"),
            ("KABSH_PRIMARY_ADMIN_EMAIL", " Owner@Kabsh.DZ "),
        ])
        .unwrap();
        assert_eq!(config.primary_admin_email.unwrap().as_str(), "owner@kabsh.dz");
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("KABSH_STORE", "memory"), ("KABSH_PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "KABSH_PORT"));
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-imgbb-key", "IMGBB_API_KEY");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "IMGBB_API_KEY");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        assert!(validate_secret_strength(IMGBB_KEY, "IMGBB_API_KEY").is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = ApiConfig::default();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = ApiConfig {
            store: StoreConfig::Postgres {
                database_url: SecretString::from("postgres://kabsh:hunter2@db/kabsh"),
            },
            image_storage: ImageStorageConfig::ImgBb {
                api_key: SecretString::from(IMGBB_KEY),
            },
            ..ApiConfig::default()
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("hunter2"));
        assert!(!debug_output.contains(IMGBB_KEY));
    }
}
