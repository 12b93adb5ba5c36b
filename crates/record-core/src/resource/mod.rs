//! DNS record resource lifecycle
//!
//! [`RecordResource`] maps a declared record onto remote client calls:
//!
//! ```text
//!              ┌──────────────────┐
//! orchestrator │  ResourceState   │ (&mut, owned per call)
//!              └────────┬─────────┘
//!                       ▼
//!              ┌──────────────────┐      ┌─────────────┐
//!              │  RecordResource  │─────▶│  DnsClient  │
//!              └──────────────────┘      └─────────────┘
//! ```
//!
//! Each operation resolves the zone from `domain` again (zone IDs are never
//! trusted from state), performs one remote write, and after Create/Update
//! re-reads the record so no stale field survives.

pub mod descriptor;
pub mod migrate;

pub use descriptor::RecordDescriptor;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{ClientError, Error, Result};
use crate::schema::ResourceSchema;
use crate::state::{InstanceState, ResourceState};
use crate::traits::{DnsClient, DnsRecord};

/// The DNS record resource
///
/// Holds only the shared client handle; all record data lives in the
/// [`ResourceState`] passed to each call.
#[derive(Clone)]
pub struct RecordResource {
    client: Arc<dyn DnsClient>,
}

impl std::fmt::Debug for RecordResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordResource")
            .field("client", &self.client.client_name())
            .finish()
    }
}

impl RecordResource {
    /// Create a resource bound to a client
    pub fn new(client: Arc<dyn DnsClient>) -> Self {
        Self { client }
    }

    /// Declared schema of the resource
    pub fn schema() -> ResourceSchema {
        ResourceSchema::record()
    }

    /// Create the record remotely and populate computed fields
    ///
    /// Validation runs before any remote call. On success `state.id` is the
    /// remote identifier and every field reflects what the service stored.
    pub async fn create(&self, state: &mut ResourceState) -> Result<()> {
        let descriptor = RecordDescriptor::from_state(state)?;

        let zone_id = self.resolve_zone(&descriptor.domain).await?;

        let record = descriptor.to_record(&zone_id);
        debug!("Record create configuration: {:?}", record);

        let created = self
            .client
            .create_record(&zone_id, &record)
            .await
            .map_err(|e| Error::remote("Failed to create record", e))?;

        if created.id.is_empty() {
            return Err(Error::remote(
                "Failed to find record in create response",
                ClientError::invalid_response("record was empty"),
            ));
        }

        state.id = created.id;
        info!("Record ID: {}", state.id);

        self.read(state).await
    }

    /// Overwrite state with the record as the service reports it
    ///
    /// A record that no longer exists surfaces as a `Remote` error for which
    /// [`Error::is_not_found`] is true; see [`RecordResource::refresh`].
    pub async fn read(&self, state: &mut ResourceState) -> Result<()> {
        ensure_id(state, "read")?;

        let zone_id = self.resolve_zone(&state.domain).await?;

        let record = self
            .client
            .get_record(&zone_id, &state.id)
            .await
            .map_err(|e| Error::remote(format!("Error reading record {:?}", state.id), e))?;

        apply_remote(state, record, zone_id);
        Ok(())
    }

    /// Push declared fields to the service, then re-read
    ///
    /// The record is fetched first; a change to a force-new attribute (the
    /// type) is rejected without writing anything. `proxied` is always sent
    /// as off.
    pub async fn update(&self, state: &mut ResourceState) -> Result<()> {
        ensure_id(state, "update")?;

        let zone_id = self.resolve_zone(&state.domain).await?;

        let current = self
            .client
            .get_record(&zone_id, &state.id)
            .await
            .map_err(|e| Error::remote(format!("Error reading record {:?}", state.id), e))?;

        let mut remote = state.clone();
        apply_remote(&mut remote, current, zone_id.clone());
        let declared = state.to_instance();
        let replaced = Self::schema().requires_replacement(&remote.to_instance(), &declared);
        if let Some(field) = replaced.into_iter().next() {
            return Err(Error::validation(
                field,
                declared.get(field).unwrap_or_default(),
                format!("changing {} requires replacement", field),
            ));
        }

        let record = DnsRecord {
            id: state.id.clone(),
            zone_id: zone_id.clone(),
            zone_name: state.domain.clone(),
            record_type: state.record_type.clone(),
            name: state.name.clone(),
            content: state.value.clone(),
            ttl: state.ttl_if_set(),
            priority: state.priority_if_set(),
            proxied: false,
        };

        debug!("Record update configuration: {:?}", record);
        self.client
            .update_record(&zone_id, &state.id, &record)
            .await
            .map_err(|e| Error::remote("Failed to update record", e))?;

        self.read(state).await
    }

    /// Delete the record remotely
    ///
    /// State is left as-is; discarding it is the caller's job.
    pub async fn delete(&self, state: &ResourceState) -> Result<()> {
        ensure_id(state, "delete")?;

        let zone_id = self.resolve_zone(&state.domain).await?;

        info!("Deleting record: {}, {}", state.domain, state.id);
        self.client
            .delete_record(&zone_id, &state.id)
            .await
            .map_err(|e| Error::remote(format!("Error deleting record {:?}", state.id), e))
    }

    /// Read, treating a vanished record as absence rather than failure
    ///
    /// Returns `Ok(false)` and marks the state absent when the record is gone.
    pub async fn refresh(&self, state: &mut ResourceState) -> Result<bool> {
        match self.read(state).await {
            Ok(()) => Ok(true),
            Err(e) if e.is_not_found() => {
                warn!("Record {} not found, removing from state", state.id);
                state.mark_absent();
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Upgrade state persisted under an older schema version
    pub async fn migrate_state(&self, version: u32, instance: InstanceState) -> Result<InstanceState> {
        migrate::migrate_state(self.client.as_ref(), version, instance).await
    }

    async fn resolve_zone(&self, domain: &str) -> Result<String> {
        self.client
            .zone_id_by_name(domain)
            .await
            .map_err(|e| Error::zone_lookup(domain, e))
    }
}

fn ensure_id(state: &ResourceState, operation: &str) -> Result<()> {
    if state.exists() {
        Ok(())
    } else {
        Err(Error::state(format!("cannot {} a record without an id", operation)))
    }
}

fn apply_remote(state: &mut ResourceState, record: DnsRecord, zone_id: String) {
    state.id = record.id;
    state.hostname = Some(record.name);
    state.record_type = record.record_type;
    state.value = record.content;
    state.ttl = record.ttl;
    state.priority = Some(record.priority.unwrap_or_default());
    state.zone_id = Some(zone_id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_remote_overwrites_everything() {
        let mut state = ResourceState::new("example.com", "www", "A", "203.0.113.5").with_ttl(60);
        state.id = "R1".to_string();
        state.hostname = Some("stale.example.com".to_string());

        let record = DnsRecord {
            id: "R1".to_string(),
            record_type: "A".to_string(),
            name: "www.example.com".to_string(),
            content: "203.0.113.9".to_string(),
            ttl: Some(1),
            priority: None,
            ..Default::default()
        };
        apply_remote(&mut state, record, "Z1".to_string());

        assert_eq!(state.hostname.as_deref(), Some("www.example.com"));
        assert_eq!(state.value, "203.0.113.9");
        assert_eq!(state.ttl, Some(1));
        assert_eq!(state.priority, Some(0));
        assert_eq!(state.zone_id.as_deref(), Some("Z1"));
        // Declared-only fields are untouched
        assert_eq!(state.name, "www");
        assert_eq!(state.domain, "example.com");
    }

    #[test]
    fn test_ensure_id() {
        let state = ResourceState::new("example.com", "www", "A", "203.0.113.5");
        let err = ensure_id(&state, "read").unwrap_err();
        assert!(err.to_string().contains("cannot read a record without an id"));
    }
}
