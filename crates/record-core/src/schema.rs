//! Declared schema of the record resource
//!
//! The orchestrator owns diffing and planning; this module only describes
//! which attributes exist, who sets them, and which changes force a new
//! resource.

use crate::error::{Error, Result};
use crate::state::InstanceState;

/// Current schema version of persisted record state
pub const SCHEMA_VERSION: u32 = 1;

/// Primitive type of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// String attribute
    String,
    /// Integer attribute
    Int,
}

/// Who supplies an attribute's value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Must be set by the caller
    Required,
    /// May be set by the caller
    Optional,
    /// Set only by the resource
    Computed,
    /// Set by the caller, or filled in by the remote service if absent
    OptionalComputed,
}

/// A single attribute declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name in resource state
    pub name: &'static str,
    /// Primitive type
    pub value_type: ValueType,
    /// Who supplies the value
    pub kind: AttributeKind,
    /// Whether a change requires replacing the resource
    pub force_new: bool,
}

impl Attribute {
    const fn new(name: &'static str, value_type: ValueType, kind: AttributeKind) -> Self {
        Self {
            name,
            value_type,
            kind,
            force_new: false,
        }
    }

    const fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }
}

/// Full schema of a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSchema {
    /// Version of the persisted state layout
    pub version: u32,
    /// Declared attributes
    pub attributes: Vec<Attribute>,
}

impl ResourceSchema {
    /// Schema of the DNS record resource
    pub fn record() -> Self {
        use AttributeKind::*;

        Self {
            version: SCHEMA_VERSION,
            attributes: vec![
                Attribute::new("domain", ValueType::String, Required),
                Attribute::new("name", ValueType::String, Required),
                Attribute::new("hostname", ValueType::String, Computed),
                Attribute::new("type", ValueType::String, Required).force_new(),
                Attribute::new("value", ValueType::String, Required),
                Attribute::new("ttl", ValueType::Int, OptionalComputed),
                Attribute::new("priority", ValueType::Int, Optional),
                Attribute::new("zone_id", ValueType::String, Computed),
            ],
        }
    }

    /// Ensure every required attribute is present in a flat state
    pub fn check_required(&self, instance: &InstanceState) -> Result<()> {
        let missing: Vec<&str> = self
            .attributes
            .iter()
            .filter(|a| a.kind == AttributeKind::Required)
            .filter(|a| !instance.attributes.contains_key(a.name))
            .map(|a| a.name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::state(format!(
                "missing required attribute(s): {}",
                missing.join(", ")
            )))
        }
    }

    /// Names of changed attributes that force a new resource
    pub fn requires_replacement(&self, old: &InstanceState, new: &InstanceState) -> Vec<&'static str> {
        self.attributes
            .iter()
            .filter(|a| a.force_new)
            .filter(|a| old.attributes.get(a.name) != new.attributes.get(a.name))
            .map(|a| a.name)
            .collect()
    }
}
