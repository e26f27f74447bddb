//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPSTYLE_API_BASE_URL` - Base URL of the commerce backend API
//!   (e.g., `http://localhost:8080/api/v1`)
//!
//! ## Optional
//! - `SHOPSTYLE_HOST` - Bind address (default: 127.0.0.1)
//! - `SHOPSTYLE_PORT` - Listen port (default: 3000)
//! - `SHOPSTYLE_HTTP_TIMEOUT_SECS` - Backend request timeout (default: 10)
//! - `SHOPSTYLE_CART_POLL_SECS` - Cart page refresh interval (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Base URL of the commerce backend API, without a trailing slash
    pub api_base_url: String,
    /// Timeout applied to every backend request
    pub http_timeout: Duration,
    /// Interval at which the cart page refetches cart state
    pub cart_poll_secs: u64,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl StorefrontConfig {
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

        let host = get_env_or_default("SHOPSTYLE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPSTYLE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("SHOPSTYLE_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPSTYLE_PORT".to_string(), e.to_string()))?;
        let api_base_url =
            validate_base_url("SHOPSTYLE_API_BASE_URL", &get_required_env("SHOPSTYLE_API_BASE_URL")?)?;
        let http_timeout = Duration::from_secs(
            get_env_or_default("SHOPSTYLE_HTTP_TIMEOUT_SECS", "10")
                .parse::<u64>()
                .map_err(|e| {
                    ConfigError::InvalidEnvVar("SHOPSTYLE_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
                })?,
        );
        let cart_poll_secs = get_env_or_default("SHOPSTYLE_CART_POLL_SECS", "10")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPSTYLE_CART_POLL_SECS".to_string(), e.to_string())
            })?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            api_base_url,
            http_timeout,
            cart_poll_secs,
            sentry_dsn,
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

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a base URL parses and uses an http(s) scheme.
///
/// Returns the URL with any trailing slash removed, so endpoint paths can
/// be appended with a leading slash.
fn validate_base_url(var_name: &str, value: &str) -> Result<String, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(value.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_base_url_strips_trailing_slash() {
        let url = validate_base_url("TEST_VAR", "http://localhost:8080/api/v1/").unwrap();
        assert_eq!(url, "http://localhost:8080/api/v1");
    }

    #[test]
    fn test_validate_base_url_rejects_garbage() {
        assert!(validate_base_url("TEST_VAR", "not a url").is_err());
    }

    #[test]
    fn test_validate_base_url_rejects_non_http_scheme() {
        let result = validate_base_url("TEST_VAR", "ftp://example.com/api");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            api_base_url: "http://localhost:8080/api/v1".to_string(),
            http_timeout: Duration::from_secs(10),
            cart_poll_secs: 10,
            sentry_dsn: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }
}
