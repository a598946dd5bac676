//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional, with demo-friendly defaults:
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `CATALOG_API_URL` - Base URL of the catalog/stock API
//!   (default: `http://localhost:3333`)
//! - `CART_SNAPSHOT_PATH` - Path of the cart snapshot file
//!   (default: rocketshoes-cart.json)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "3000";
const DEFAULT_CATALOG_API_URL: &str = "http://localhost:3333";
const DEFAULT_SNAPSHOT_PATH: &str = "rocketshoes-cart.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
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
    /// Catalog API configuration
    pub catalog: CatalogConfig,
    /// Path of the cart snapshot file
    pub snapshot_path: PathBuf,
}

/// Catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the catalog/stock service
    pub base_url: Url,
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

        let host = parse_host(&get_env_or_default("STOREFRONT_HOST", DEFAULT_HOST))?;
        let port = parse_port(&get_env_or_default("STOREFRONT_PORT", DEFAULT_PORT))?;
        let base_url = parse_base_url(&get_env_or_default(
            "CATALOG_API_URL",
            DEFAULT_CATALOG_API_URL,
        ))?;
        let snapshot_path =
            PathBuf::from(get_env_or_default("CART_SNAPSHOT_PATH", DEFAULT_SNAPSHOT_PATH));

        Ok(Self {
            host,
            port,
            catalog: CatalogConfig { base_url },
            snapshot_path,
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

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_host(value: &str) -> Result<IpAddr, ConfigError> {
    value
        .parse::<IpAddr>()
        .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string()))
}

fn parse_port(value: &str) -> Result<u16, ConfigError> {
    value
        .parse::<u16>()
        .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string()))
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar("CATALOG_API_URL".to_string(), e.to_string()))
}
