//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `BOOKSTORE_API_URL` - Base URL of the REST API (default: `http://127.0.0.1:8000/api`)
//! - `BOOKSTORE_API_TOKEN` - Bearer token attached to every request
//! - `BOOKSTORE_DATA_DIR` - Directory holding the persisted cart (default: `.bookstore`)
//! - `BOOKSTORE_REQUEST_TIMEOUT_SECS` - Per-request timeout; unset or `0` means none
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::storage::CART_KEY;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";
const DEFAULT_DATA_DIR: &str = ".bookstore";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// REST API connection settings
    pub api: ApiConfig,
    /// Directory for locally persisted state
    pub data_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
}

/// Bookstore REST API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL; always ends with `/` so relative joins stay under it
    pub base_url: Url,
    /// Bearer token, if signed in
    pub token: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ApiConfig {
    /// Configuration for an API at `base_url` with no token and no timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `base_url` is not an absolute
    /// http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("BOOKSTORE_API_URL", base_url)?,
            token: None,
            timeout: None,
        })
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = parse_base_url(
            "BOOKSTORE_API_URL",
            &get_env_or_default("BOOKSTORE_API_URL", DEFAULT_API_URL),
        )?;
        let token = get_optional_env("BOOKSTORE_API_TOKEN").map(SecretString::from);
        let timeout = get_optional_env("BOOKSTORE_REQUEST_TIMEOUT_SECS")
            .map(|v| parse_timeout("BOOKSTORE_REQUEST_TIMEOUT_SECS", &v))
            .transpose()?
            .flatten();

        Ok(Self {
            api: ApiConfig {
                base_url,
                token,
                timeout,
            },
            data_dir: PathBuf::from(get_env_or_default("BOOKSTORE_DATA_DIR", DEFAULT_DATA_DIR)),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Path of the persisted cart document.
    #[must_use]
    pub fn cart_path(&self) -> PathBuf {
        self.data_dir.join(format!("{CART_KEY}.json"))
    }
}

/// Parse an absolute http(s) URL and make sure its path ends with `/`.
fn parse_base_url(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Parse a timeout in whole seconds; `0` disables it.
fn parse_timeout(var_name: &str, value: &str) -> Result<Option<Duration>, ConfigError> {
    let secs = value
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}
