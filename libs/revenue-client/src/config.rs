//! Environment-driven configuration.

use std::env;

use dotenv::dotenv;
use thiserror::Error;

/// Environment variable holding the backend origin/prefix.
pub const API_BASE_ENV: &str = "REVENUE_API_BASE";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("REVENUE_API_BASE is not set; point it at the revenue backend origin")]
    MissingBaseUrl,
}

/// Client configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin/prefix, trailing slash stripped.
    pub base_url: String,
}

impl ClientConfig {
    /// Read configuration from the environment (`.env` honored).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        let raw = env::var(API_BASE_ENV).unwrap_or_default();
        if raw.is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        Ok(Self {
            base_url: raw.trim_end_matches('/').to_string(),
        })
    }
}
