//! Importer configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PRODUCT_FEED_URL` - Base URL of the paginated product feed
//! - `CONTENT_STORE_API_URL` - Content store API base URL (versioned)
//! - `CONTENT_STORE_DATASET` - Dataset name within the content store
//! - `CONTENT_STORE_WRITE_TOKEN` - Write token for mutations and asset uploads
//!
//! ## Optional
//! - `PRODUCT_FEED_PAGE_SIZE` - Records per feed page (default: 50)
//! - `IMPORT_TIMEOUT_SECS` - Per-request timeout for all HTTP calls (default: 30)

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Import pipeline configuration.
#[derive(Debug, Clone)]
pub struct ImporterConfig {
    /// Base URL of the product feed (paginated via `?offset=&limit=`).
    pub feed_url: String,
    /// Records requested per feed page. A short page terminates pagination.
    pub page_size: u32,
    /// Per-request timeout applied to feed, image, and content-store calls.
    pub request_timeout_secs: u64,
    /// Content store connection settings.
    pub content_store: ContentStoreConfig,
}

/// Content store (write side) configuration.
///
/// Implements `Debug` manually to redact the write token.
#[derive(Clone)]
pub struct ContentStoreConfig {
    /// Versioned API base URL, e.g. `https://content.example.com/v1`.
    pub api_url: String,
    /// Dataset name.
    pub dataset: String,
    /// Token authorizing mutations and asset uploads.
    pub write_token: SecretString,
}

impl std::fmt::Debug for ContentStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStoreConfig")
            .field("api_url", &self.api_url)
            .field("dataset", &self.dataset)
            .field("write_token", &"[REDACTED]")
            .finish()
    }
}

impl ImporterConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let feed_url = get_required_env("PRODUCT_FEED_URL")?;
        let page_size = get_env_or_default("PRODUCT_FEED_PAGE_SIZE", "50")
            .parse::<u32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("PRODUCT_FEED_PAGE_SIZE".to_string(), e.to_string())
            })?;
        if page_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "PRODUCT_FEED_PAGE_SIZE".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        let request_timeout_secs = get_env_or_default("IMPORT_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("IMPORT_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            feed_url,
            page_size,
            request_timeout_secs,
            content_store: ContentStoreConfig::from_env()?,
        })
    }
}

impl ContentStoreConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: get_required_env("CONTENT_STORE_API_URL")?,
            dataset: get_required_env("CONTENT_STORE_DATASET")?,
            write_token: get_required_env("CONTENT_STORE_WRITE_TOKEN").map(SecretString::from)?,
        })
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_store_config_debug_redacts_token() {
        let config = ContentStoreConfig {
            api_url: "https://content.example.com/v1".to_string(),
            dataset: "production".to_string(),
            write_token: SecretString::from("super_secret_write_token"),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("https://content.example.com/v1"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_write_token"));
    }
}
