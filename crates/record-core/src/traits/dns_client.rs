// # DNS Client Trait
//
// Defines the outbound interface the record resource uses to talk to a
// remote DNS service.
//
// ## Implementations
//
// - Cloudflare: `record-client-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use record_core::DnsClient;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let client = /* DnsClient implementation */;
//
//     let zone_id = client.zone_id_by_name("example.com").await?;
//     let record = client.get_record(&zone_id, "372e67954025e0ba6aaa6d586b9e0b59").await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// A DNS record as exchanged with the remote service
///
/// Used both as the request payload (create/update) and as the response
/// (create/get/list). Fields the service fills in are `Option`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Remote-assigned record identifier (empty on create payloads)
    #[serde(default)]
    pub id: String,
    /// Zone identifier the record belongs to
    #[serde(default)]
    pub zone_id: String,
    /// Zone name the record belongs to
    #[serde(default)]
    pub zone_name: String,
    /// Record type (e.g. "A", "MX")
    pub record_type: String,
    /// Record name
    pub name: String,
    /// Record content
    pub content: String,
    /// Time-to-live in seconds; `None` lets the service pick its default
    pub ttl: Option<u32>,
    /// Priority for record types that carry one (MX, SRV)
    pub priority: Option<u16>,
    /// Whether traffic is proxied through the provider
    #[serde(default)]
    pub proxied: bool,
}

/// Filter for listing records within a zone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Match on record name
    pub name: Option<String>,
    /// Match on record type
    pub record_type: Option<String>,
}

impl RecordFilter {
    /// Create an empty filter (matches everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a record name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Restrict to a record type
    pub fn with_record_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = Some(record_type.into());
        self
    }

    /// Check whether a record satisfies this filter
    pub fn matches(&self, record: &DnsRecord) -> bool {
        self.name.as_ref().is_none_or(|n| *n == record.name)
            && self
                .record_type
                .as_ref()
                .is_none_or(|t| *t == record.record_type)
    }
}

/// Trait for remote DNS client implementations
///
/// A client is a shared handle: the resource holds it behind an `Arc` and
/// every lifecycle call borrows it. Implementations must be thread-safe.
///
/// Clients perform exactly one remote call per method. Retries, backoff and
/// rate limiting, if any, belong inside the client's transport, never in the
/// resource.
#[async_trait]
pub trait DnsClient: Send + Sync {
    /// Resolve a zone identifier from its name
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The zone ID
    /// - `Err(ClientError::NotFound)`: If no zone has this name
    async fn zone_id_by_name(&self, zone_name: &str) -> Result<String, ClientError>;

    /// Create a record in a zone
    ///
    /// Returns the record as stored by the service. Callers must not assume
    /// the returned `id` is non-empty.
    async fn create_record(
        &self,
        zone_id: &str,
        record: &DnsRecord,
    ) -> Result<DnsRecord, ClientError>;

    /// Fetch a record by ID
    ///
    /// # Returns
    ///
    /// - `Ok(DnsRecord)`: The record's current fields
    /// - `Err(ClientError::NotFound)`: If the record no longer exists
    async fn get_record(&self, zone_id: &str, record_id: &str) -> Result<DnsRecord, ClientError>;

    /// Replace a record's fields
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        record: &DnsRecord,
    ) -> Result<(), ClientError>;

    /// Delete a record
    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<(), ClientError>;

    /// List the records of a zone matching `filter`
    async fn list_records(
        &self,
        zone_id: &str,
        filter: &RecordFilter,
    ) -> Result<Vec<DnsRecord>, ClientError>;

    /// Get the client name (for logging/debugging)
    fn client_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS clients from configuration
pub trait DnsClientFactory: Send + Sync {
    /// Create a DnsClient instance from configuration
    fn create(
        &self,
        config: &crate::config::ClientConfig,
    ) -> Result<std::sync::Arc<dyn DnsClient>, crate::Error>;
}
