//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL` - `PostgreSQL` connection string
//!
//! ## Optional
//! - `API_HOST` - Bind address (default: 127.0.0.1)
//! - `API_PORT` - Listen port (default: 8000)
//! - `MEDIA_ROOT` - Directory for uploaded images (default: `media`)
//! - `CHECKOUT_MODE` - `lenient` (skip unknown products, the historical
//!   behavior) or `strict` (reject the whole checkout); default: `lenient`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag (e.g. `production`)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

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

/// How checkout treats item entries whose product id does not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutMode {
    /// Drop unresolvable entries from the order and log a warning.
    ///
    /// Matches the behavior the web front end was built against.
    #[default]
    Lenient,
    /// Fail the whole checkout with a not-found error.
    Strict,
}

impl std::str::FromStr for CheckoutMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            _ => Err(format!(
                "invalid checkout mode: {s} (expected lenient or strict)"
            )),
        }
    }
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory where uploaded images are stored
    pub media_root: PathBuf,
    /// Unknown-product handling during checkout
    pub checkout_mode: CheckoutMode,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or any
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = require_env("DATABASE_URL")?;

        let host = parse_env("API_HOST", IpAddr::V4(Ipv4Addr::LOCALHOST))?;
        let port = parse_env("API_PORT", 8000)?;
        let media_root = std::env::var("MEDIA_ROOT")
            .map_or_else(|_| PathBuf::from("media"), PathBuf::from);
        let checkout_mode = parse_env("CHECKOUT_MODE", CheckoutMode::default())?;

        let sentry_dsn = std::env::var("SENTRY_DSN").ok().filter(|v| !v.is_empty());
        let sentry_environment = std::env::var("SENTRY_ENVIRONMENT").ok();

        Ok(Self {
            database_url: SecretString::from(database_url),
            host,
            port,
            media_root,
            checkout_mode,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Socket address to bind the server to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

fn parse_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkout_mode_parses_case_insensitively() {
        assert_eq!("lenient".parse::<CheckoutMode>(), Ok(CheckoutMode::Lenient));
        assert_eq!("Strict".parse::<CheckoutMode>(), Ok(CheckoutMode::Strict));
        assert!("drop".parse::<CheckoutMode>().is_err());
    }

    #[test]
    fn checkout_mode_defaults_to_lenient() {
        assert_eq!(CheckoutMode::default(), CheckoutMode::Lenient);
    }
}
