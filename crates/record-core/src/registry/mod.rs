//! Plugin-based client registry
//!
//! The registry maps client type names to factories, so drivers can build a
//! [`DnsClient`] from configuration without hardcoded if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use record_core::registry::ClientRegistry;
//! use record_core::config::ClientConfig;
//!
//! let registry = ClientRegistry::new();
//! record_client_cloudflare::register(&registry);
//!
//! let client = registry.create_client(&ClientConfig::cloudflare(token))?;
//! ```

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::traits::{DnsClient, DnsClientFactory};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Registry of DNS client factories
///
/// Uses interior mutability with RwLock, allowing concurrent reads and
/// exclusive writes.
#[derive(Default)]
pub struct ClientRegistry {
    clients: RwLock<HashMap<String, Box<dyn DnsClientFactory>>>,
}

impl ClientRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client factory under a type name
    pub fn register_client(&self, name: impl Into<String>, factory: Box<dyn DnsClientFactory>) {
        let mut clients = self.clients.write().unwrap_or_else(PoisonError::into_inner);
        clients.insert(name.into(), factory);
    }

    /// Create a client from configuration
    ///
    /// The configuration is validated before the factory sees it.
    pub fn create_client(&self, config: &ClientConfig) -> Result<Arc<dyn DnsClient>> {
        config.validate()?;

        let client_type = config.type_name();
        let clients = self.clients.read().unwrap_or_else(PoisonError::into_inner);

        let factory = clients
            .get(client_type)
            .ok_or_else(|| Error::config(format!("Unknown client type: {}", client_type)))?;

        factory.create(config)
    }

    /// List all registered client types
    pub fn list_clients(&self) -> Vec<String> {
        let clients = self.clients.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = clients.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a client type is registered
    pub fn has_client(&self, name: &str) -> bool {
        let clients = self.clients.read().unwrap_or_else(PoisonError::into_inner);
        clients.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockClientFactory;

    impl DnsClientFactory for MockClientFactory {
        fn create(&self, _config: &ClientConfig) -> Result<Arc<dyn DnsClient>> {
            Err(Error::config("Mock client not implemented"))
        }
    }

    fn custom_config(factory: &str) -> ClientConfig {
        ClientConfig::Custom {
            factory: factory.to_string(),
            config: serde_json::json!({}),
        }
    }

    #[test]
    fn test_registry_registration() {
        let registry = ClientRegistry::new();
        assert!(!registry.has_client("mock"));

        registry.register_client("mock", Box::new(MockClientFactory));

        assert!(registry.has_client("mock"));
        assert_eq!(registry.list_clients(), vec!["mock".to_string()]);
    }

    #[test]
    fn test_unknown_client_type() {
        let registry = ClientRegistry::new();
        let err = registry.create_client(&custom_config("missing")).err().unwrap();
        assert!(err.to_string().contains("Unknown client type: missing"));
    }

    #[test]
    fn test_factory_is_invoked() {
        let registry = ClientRegistry::new();
        registry.register_client("mock", Box::new(MockClientFactory));

        let err = registry.create_client(&custom_config("mock")).err().unwrap();
        assert!(err.to_string().contains("Mock client not implemented"));
    }

    #[test]
    fn test_invalid_config_rejected_before_factory() {
        let registry = ClientRegistry::new();
        let err = registry
            .create_client(&ClientConfig::cloudflare(""))
            .err()
            .unwrap();
        assert!(err.to_string().contains("API token cannot be empty"));
    }
}
