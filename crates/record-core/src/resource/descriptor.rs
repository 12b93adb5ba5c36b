//! Typed record declaration extracted from resource state

use crate::error::Result;
use crate::state::ResourceState;
use crate::traits::DnsRecord;
use crate::validation::{RecordType, validate_record_content, validate_record_type};

/// A validated record declaration
///
/// Only constructible through [`RecordDescriptor::from_state`], so holding
/// one means the type is known and the value fits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDescriptor {
    /// Zone name
    pub domain: String,
    /// Record label
    pub name: String,
    /// Record type
    pub record_type: RecordType,
    /// Record content
    pub value: String,
    /// Time-to-live, if set
    pub ttl: Option<u32>,
    /// Priority, if set
    pub priority: Option<u16>,
}

impl RecordDescriptor {
    /// Extract and validate the declared fields of a resource state
    ///
    /// The value is checked against the declared type first, then the type
    /// itself. New records are never proxied.
    pub fn from_state(state: &ResourceState) -> Result<Self> {
        validate_record_content(&state.record_type, &state.value)?;
        let record_type = validate_record_type(&state.record_type, false)?;

        Ok(Self {
            domain: state.domain.clone(),
            name: state.name.clone(),
            record_type,
            value: state.value.clone(),
            ttl: state.ttl_if_set(),
            priority: state.priority_if_set(),
        })
    }

    /// Build the create payload for a resolved zone
    pub fn to_record(&self, zone_id: &str) -> DnsRecord {
        DnsRecord {
            id: String::new(),
            zone_id: zone_id.to_string(),
            zone_name: self.domain.clone(),
            record_type: self.record_type.as_str().to_string(),
            name: self.name.clone(),
            content: self.value.clone(),
            ttl: self.ttl,
            priority: self.priority,
            proxied: false,
        }
    }
}
