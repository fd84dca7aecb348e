//! Configuration management for the geocoder quota service
//!
//! Configuration is loaded from environment variables.

use anyhow::{Context, Result};
use std::env;

use crate::error::{AppError, AppResult};

/// Default Redis host for quota records
pub const DEFAULT_REDIS_HOST: &str = "localhost";
/// Default Redis port
pub const DEFAULT_REDIS_PORT: u16 = 6379;
/// Default Redis database index holding user quota records
pub const DEFAULT_REDIS_DB: i64 = 5;

/// Resolved connection settings for the quota store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub db: i64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_REDIS_HOST.to_string(),
            port: DEFAULT_REDIS_PORT,
            db: DEFAULT_REDIS_DB,
        }
    }
}

impl ConnectionConfig {
    /// Redis URL for this configuration
    pub fn redis_url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }
}

/// Connection parameters as supplied by a caller
///
/// The host is mandatory; port and database index fall back to
/// [`DEFAULT_REDIS_PORT`] and [`DEFAULT_REDIS_DB`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionParams {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub db: Option<i64>,
}

impl ConnectionParams {
    /// Parameters with only a host set
    pub fn with_host(host: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            ..Self::default()
        }
    }

    /// Resolve the parameters into a full configuration
    pub fn resolve(&self) -> AppResult<ConnectionConfig> {
        let host = match self.host.as_deref().map(str::trim) {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => {
                return Err(AppError::Configuration(
                    "a redis host or an existing connection is required".to_string(),
                ))
            }
        };

        Ok(ConnectionConfig {
            host,
            port: self.port.unwrap_or(DEFAULT_REDIS_PORT),
            db: self.db.unwrap_or(DEFAULT_REDIS_DB),
        })
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Quota store connection parameters
    pub redis: ConnectionParams,

    /// Time/distance matrix API base URL
    pub matrix_api_url: String,
    /// Time/distance matrix API key (matrix client disabled when absent)
    pub matrix_api_key: Option<String>,

    /// Enable debug logging defaults
    pub debug_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            redis: ConnectionParams::with_host(DEFAULT_REDIS_HOST),
            matrix_api_url: "https://matrix.mapzen.com".to_string(),
            matrix_api_key: None,
            debug_enabled: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("GEOCODER_QUOTA_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("GEOCODER_QUOTA_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid GEOCODER_QUOTA_PORT")?,

            redis: ConnectionParams {
                host: Some(
                    env::var("REDIS_HOST").unwrap_or_else(|_| DEFAULT_REDIS_HOST.to_string()),
                ),
                port: env::var("REDIS_PORT")
                    .ok()
                    .map(|v| v.parse())
                    .transpose()
                    .context("Invalid REDIS_PORT")?,
                db: env::var("REDIS_DB")
                    .ok()
                    .map(|v| v.parse())
                    .transpose()
                    .context("Invalid REDIS_DB")?,
            },

            matrix_api_url: env::var("MATRIX_API_URL")
                .unwrap_or_else(|_| "https://matrix.mapzen.com".to_string()),
            matrix_api_key: env::var("MATRIX_API_KEY").ok(),

            debug_enabled: env::var("GEOCODER_QUOTA_DEBUG")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        })
    }
}
