//! Environment configuration for the API binary.

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug)]
pub enum ConfigError {
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {key}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Runtime settings.
///
/// The database and identity-provider settings are optional as a trio: when
/// all are absent the binary runs against seeded in-memory services (dev
/// mode); when all are present it wires Postgres and the real provider.
/// A partial set is a startup error.
#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: Option<String>,
    pub identity_provider_url: Option<String>,
    pub identity_provider_api_key: Option<String>,
    /// Zero disables the validation cache.
    pub validation_cache_ttl_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);

        let addr = SocketAddr::from_str(&format!("0.0.0.0:{port}"))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let validation_cache_ttl_seconds = std::env::var("VALIDATION_CACHE_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            addr,
            database_url: std::env::var("DATABASE_URL").ok(),
            identity_provider_url: std::env::var("IDENTITY_PROVIDER_URL").ok(),
            identity_provider_api_key: std::env::var("IDENTITY_PROVIDER_API_KEY").ok(),
            validation_cache_ttl_seconds,
        })
    }
}
