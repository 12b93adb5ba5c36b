// # Resource State
//
// Two views of the same record state:
//
// - `InstanceState`: the flat, versioned key/value form the orchestrator
//   persists between runs.
// - `ResourceState`: the typed view the lifecycle operations work on.
//
// Conversion between them is the only place attribute strings are parsed.

pub mod file;

pub use file::StateFile;

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::{ResourceSchema, SCHEMA_VERSION};

/// Flat persisted form of a resource instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceState {
    /// Layout version the attributes were written with
    #[serde(default)]
    pub schema_version: u32,
    /// Remote identifier; empty when the instance does not exist
    #[serde(default)]
    pub id: String,
    /// Attribute values, all stored as strings
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl InstanceState {
    /// Create an instance at the current schema version
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Whether this instance refers to no remote record
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }

    /// Get an attribute value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Set an attribute value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }
}

/// Typed state of a single DNS record resource
///
/// Declared fields (`domain`, `name`, `record_type`, `value`, `ttl`,
/// `priority`) come from the caller. Computed fields (`hostname`, `zone_id`)
/// are written only by the lifecycle operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceState {
    /// Remote-assigned identifier; empty until created
    pub id: String,
    /// Zone name
    pub domain: String,
    /// Record label
    pub name: String,
    /// Fully-qualified name as reported by the service
    pub hostname: Option<String>,
    /// Record type, as declared (validated on create)
    pub record_type: String,
    /// Record content
    pub value: String,
    /// Time-to-live in seconds
    pub ttl: Option<u32>,
    /// Priority (MX, SRV)
    pub priority: Option<u16>,
    /// Zone identifier the record was last resolved to
    pub zone_id: Option<String>,
}

impl ResourceState {
    /// Create a state from the required declared fields
    pub fn new(
        domain: impl Into<String>,
        name: impl Into<String>,
        record_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            name: name.into(),
            record_type: record_type.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: u16) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Whether the resource exists remotely
    pub fn exists(&self) -> bool {
        !self.id.is_empty()
    }

    /// TTL to send to the service; zero means "not set"
    pub fn ttl_if_set(&self) -> Option<u32> {
        self.ttl.filter(|ttl| *ttl != 0)
    }

    /// Priority to send to the service; zero means "not set"
    pub fn priority_if_set(&self) -> Option<u16> {
        self.priority.filter(|priority| *priority != 0)
    }

    /// Drop the remote identity and everything computed from it
    ///
    /// Declared fields are kept so the caller can see what was configured.
    pub fn mark_absent(&mut self) {
        self.id.clear();
        self.hostname = None;
        self.zone_id = None;
    }

    /// Build the typed view from a flat instance
    pub fn from_instance(instance: &InstanceState) -> Result<Self> {
        ResourceSchema::record().check_required(instance)?;

        let required = |key: &str| instance.get(key).unwrap_or_default().to_string();

        Ok(Self {
            id: instance.id.clone(),
            domain: required("domain"),
            name: required("name"),
            hostname: instance.get("hostname").map(str::to_string),
            record_type: required("type"),
            value: required("value"),
            ttl: parse_int_attribute(instance, "ttl")?,
            priority: parse_int_attribute(instance, "priority")?,
            zone_id: instance.get("zone_id").map(str::to_string),
        })
    }

    /// Flatten into an instance at the current schema version
    pub fn to_instance(&self) -> InstanceState {
        let mut instance = InstanceState::new(self.id.clone());
        instance.set("domain", &self.domain);
        instance.set("name", &self.name);
        instance.set("type", &self.record_type);
        instance.set("value", &self.value);
        if let Some(hostname) = &self.hostname {
            instance.set("hostname", hostname);
        }
        if let Some(ttl) = self.ttl {
            instance.set("ttl", ttl.to_string());
        }
        if let Some(priority) = self.priority {
            instance.set("priority", priority.to_string());
        }
        if let Some(zone_id) = &self.zone_id {
            instance.set("zone_id", zone_id);
        }
        instance
    }
}

fn parse_int_attribute<T: FromStr>(instance: &InstanceState, key: &str) -> Result<Option<T>> {
    match instance.get(key) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| Error::state(format!("attribute {} is not a valid integer: {:?}", key, raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_round_trip() {
        let mut state = ResourceState::new("example.com", "mail", "MX", "mx1.example.com")
            .with_ttl(300)
            .with_priority(10);
        state.id = "R1".to_string();
        state.hostname = Some("mail.example.com".to_string());
        state.zone_id = Some("Z1".to_string());

        let instance = state.to_instance();
        assert_eq!(instance.schema_version, SCHEMA_VERSION);
        assert_eq!(instance.get("priority"), Some("10"));
        assert_eq!(ResourceState::from_instance(&instance).unwrap(), state);
    }

    #[test]
    fn test_optional_attributes_omitted() {
        let state = ResourceState::new("example.com", "www", "A", "203.0.113.5");
        let instance = state.to_instance();
        assert!(instance.get("ttl").is_none());
        assert!(instance.get("hostname").is_none());
        assert!(instance.is_empty());
    }

    #[test]
    fn test_malformed_integer_is_state_error() {
        let mut instance = ResourceState::new("example.com", "www", "A", "203.0.113.5").to_instance();
        instance.set("ttl", "soon");

        let err = ResourceState::from_instance(&instance).unwrap_err();
        assert!(matches!(err, Error::State(_)));
        assert!(err.to_string().contains("ttl"));
    }

    #[test]
    fn test_missing_required_attribute() {
        let mut instance = InstanceState::new("");
        instance.set("domain", "example.com");
        assert!(matches!(
            ResourceState::from_instance(&instance),
            Err(Error::State(_))
        ));
    }

    #[test]
    fn test_zero_means_unset() {
        let mut state = ResourceState::new("example.com", "www", "A", "203.0.113.5");
        state.ttl = Some(0);
        state.priority = Some(0);
        assert_eq!(state.ttl_if_set(), None);
        assert_eq!(state.priority_if_set(), None);

        let state = state.with_ttl(120).with_priority(5);
        assert_eq!(state.ttl_if_set(), Some(120));
        assert_eq!(state.priority_if_set(), Some(5));
    }

    #[test]
    fn test_mark_absent_keeps_declaration() {
        let mut state = ResourceState::new("example.com", "www", "A", "203.0.113.5");
        state.id = "R1".to_string();
        state.zone_id = Some("Z1".to_string());
        state.hostname = Some("www.example.com".to_string());

        state.mark_absent();
        assert!(!state.exists());
        assert_eq!(state.zone_id, None);
        assert_eq!(state.value, "203.0.113.5");
    }
}
