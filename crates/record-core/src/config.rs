//! Configuration types for the record resource
//!
//! The resource itself takes no configuration beyond its client handle; this
//! module describes how that client is built.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default timeout for remote API requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// DNS client configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientConfig {
    /// Cloudflare API v4 client
    Cloudflare {
        /// Cloudflare API token
        api_token: String,
        /// API base URL override (defaults to the public endpoint)
        #[serde(default)]
        base_url: Option<String>,
        /// Request timeout in seconds
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },

    /// Custom client
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ClientConfig {
    /// Cloudflare configuration with defaults for everything but the token
    pub fn cloudflare(api_token: impl Into<String>) -> Self {
        ClientConfig::Cloudflare {
            api_token: api_token.into(),
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Validate the client configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ClientConfig::Cloudflare {
                api_token,
                base_url,
                timeout_secs,
            } => {
                if api_token.is_empty() {
                    return Err(crate::Error::config("Cloudflare API token cannot be empty"));
                }
                if let Some(url) = base_url
                    && !url.starts_with("https://")
                    && !url.starts_with("http://")
                {
                    return Err(crate::Error::config(format!(
                        "Cloudflare base URL must use HTTP or HTTPS scheme. Got: {}",
                        url
                    )));
                }
                if !(1..=300).contains(timeout_secs) {
                    return Err(crate::Error::config(format!(
                        "Client timeout must be between 1 and 300 seconds. Got: {}",
                        timeout_secs
                    )));
                }
                Ok(())
            }
            ClientConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config("Custom client factory cannot be empty"));
                }
                if config.is_null() {
                    return Err(crate::Error::config("Custom client config cannot be null"));
                }
                Ok(())
            }
        }
    }

    /// Get the client type name
    pub fn type_name(&self) -> &str {
        match self {
            ClientConfig::Cloudflare { .. } => "cloudflare",
            ClientConfig::Custom { factory, .. } => factory,
        }
    }
}

// The API token must never end up in logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientConfig::Cloudflare {
                base_url,
                timeout_secs,
                ..
            } => f
                .debug_struct("Cloudflare")
                .field("api_token", &"<REDACTED>")
                .field("base_url", base_url)
                .field("timeout_secs", timeout_secs)
                .finish(),
            ClientConfig::Custom { factory, .. } => f
                .debug_struct("Custom")
                .field("factory", factory)
                .field("config", &"<REDACTED>")
                .finish(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
