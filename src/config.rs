//! Configuration.
//!
//! # Environment Variables (server)
//!
//! - `STORE_HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 3000)
//! - `STORE_DATA_PATH` - Catalog JSON document (default: data.json)
//! - `STORE_UPLOADS_DIR` - Uploaded image directory (default: uploads)
//! - `STORE_ADMIN_PASSWORD` - Shared secret for mutating API calls (default: admin123)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Catalog API server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub data_path: PathBuf,
    pub uploads_dir: PathBuf,
    pub admin_password: SecretString,
}

impl ServerConfig {
    /// Load from the process environment. `main` reads `.env` beforehand.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = get_env_or_default("STORE_HOST", "0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("STORE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;
        let admin_password = match std::env::var("STORE_ADMIN_PASSWORD") {
            Ok(v) if !v.is_empty() => v,
            _ => {
                tracing::warn!("STORE_ADMIN_PASSWORD not set, using the default admin password");
                DEFAULT_ADMIN_PASSWORD.to_string()
            }
        };

        Ok(Self {
            host,
            port,
            data_path: get_env_or_default("STORE_DATA_PATH", "data.json").into(),
            uploads_dir: get_env_or_default("STORE_UPLOADS_DIR", "uploads").into(),
            admin_password: SecretString::from(admin_password),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Shared-secret check for mutating requests.
    pub fn verify_admin(&self, password: &str) -> bool {
        self.admin_password.expose_secret() == password
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Whether the storefront falls back to the cached catalog when the
/// network fetch fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheFallback {
    #[default]
    Enabled,
    Disabled,
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `http://localhost:3000/api`.
    pub api_base: String,
    pub store_name: String,
    pub contact_number: String,
    pub cache_fallback: CacheFallback,
}

impl ClientConfig {
    pub fn new(api_base: impl Into<String>, store_name: impl Into<String>, contact_number: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            store_name: store_name.into(),
            contact_number: contact_number.into(),
            cache_fallback: CacheFallback::default(),
        }
    }

    pub fn with_cache_fallback(mut self, policy: CacheFallback) -> Self {
        self.cache_fallback = policy;
        self
    }
}
