//! Environment-driven application configuration.

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::Url;

const BIND_ADDR: &str = "BIND_ADDR";
const DATABASE_URL: &str = "DATABASE_URL";
const DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";
const USER_SERVICE_URL: &str = "USER_SERVICE_URL";
const CART_SERVICE_URL: &str = "CART_SERVICE_URL";
const PRODUCT_SERVICE_URL: &str = "PRODUCT_SERVICE_URL";
const UPSTREAM_TIMEOUT_SECS: &str = "UPSTREAM_TIMEOUT_SECS";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is absent.
    #[error("missing required environment variable {name}")]
    Missing {
        /// Variable name.
        name: &'static str,
    },
    /// An environment variable holds an unparseable value.
    #[error("invalid value for {name}: {message}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Parse failure description.
        message: String,
    },
}

/// Application configuration assembled at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Maximum connections kept in the database pool.
    pub database_max_connections: u32,
    /// Base URL of the user directory service.
    pub user_service_url: Url,
    /// Base URL of the cart service.
    pub cart_service_url: Url,
    /// Base URL of the product catalog service.
    pub product_service_url: Url,
    /// Request timeout applied to every collaborator call.
    pub upstream_timeout: Duration,
}

fn require(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing { name })
}

fn parse_url(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Url, ConfigError> {
    let raw = require(lookup, name)?;
    Url::parse(&raw).map_err(|error| ConfigError::Invalid {
        name,
        message: error.to_string(),
    })
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup(BIND_ADDR)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned())
            .parse()
            .map_err(|error: std::net::AddrParseError| ConfigError::Invalid {
                name: BIND_ADDR,
                message: error.to_string(),
            })?;

        let database_url = require(&lookup, DATABASE_URL)?;

        let database_max_connections = match lookup(DATABASE_MAX_CONNECTIONS) {
            None => DEFAULT_MAX_CONNECTIONS,
            Some(raw) => raw.parse().map_err(|error: std::num::ParseIntError| {
                ConfigError::Invalid {
                    name: DATABASE_MAX_CONNECTIONS,
                    message: error.to_string(),
                }
            })?,
        };

        let upstream_timeout = match lookup(UPSTREAM_TIMEOUT_SECS) {
            None => Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|error: std::num::ParseIntError| {
                    ConfigError::Invalid {
                        name: UPSTREAM_TIMEOUT_SECS,
                        message: error.to_string(),
                    }
                })?;
                Duration::from_secs(secs)
            }
        };

        Ok(Self {
            bind_addr,
            database_url,
            database_max_connections,
            user_service_url: parse_url(&lookup, USER_SERVICE_URL)?,
            cart_service_url: parse_url(&lookup, CART_SERVICE_URL)?,
            product_service_url: parse_url(&lookup, PRODUCT_SERVICE_URL)?,
            upstream_timeout,
        })
    }
}
