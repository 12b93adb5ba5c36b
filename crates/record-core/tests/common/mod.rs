//! Test doubles and common utilities for lifecycle contract tests
//!
//! `MockDnsClient` is an in-memory DNS service with per-method call counters,
//! so tests can assert both outcomes and which remote calls happened.

#![allow(dead_code)]

use record_core::error::ClientError;
use record_core::traits::{DnsClient, DnsRecord, RecordFilter};
use record_core::{RecordResource, ResourceState};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// TTL the mock service applies when none is requested
pub const SERVICE_DEFAULT_TTL: u32 = 1;

/// Per-method call counters
#[derive(Default)]
pub struct CallCounts {
    pub zone_lookups: AtomicUsize,
    pub creates: AtomicUsize,
    pub gets: AtomicUsize,
    pub updates: AtomicUsize,
    pub deletes: AtomicUsize,
    pub lists: AtomicUsize,
}

/// An in-memory DnsClient that tracks calls
pub struct MockDnsClient {
    /// Zone name -> zone ID
    zones: Mutex<HashMap<String, String>>,
    /// Record ID -> record
    records: Mutex<HashMap<String, DnsRecord>>,
    /// Last payload passed to update_record()
    last_update: Mutex<Option<DnsRecord>>,
    next_id: AtomicUsize,
    /// When set, create_record() succeeds but returns an empty ID
    empty_id_on_create: AtomicBool,
    /// When set, every record call fails with a transient server error
    remote_down: AtomicBool,
    pub calls: CallCounts,
}

impl MockDnsClient {
    /// Create a mock serving a single zone
    pub fn new(zone_name: &str, zone_id: &str) -> Self {
        let client = Self {
            zones: Mutex::new(HashMap::new()),
            records: Mutex::new(HashMap::new()),
            last_update: Mutex::new(None),
            next_id: AtomicUsize::new(1),
            empty_id_on_create: AtomicBool::new(false),
            remote_down: AtomicBool::new(false),
            calls: CallCounts::default(),
        };
        client.add_zone(zone_name, zone_id);
        client
    }

    /// Serve an additional zone
    pub fn add_zone(&self, zone_name: &str, zone_id: &str) {
        self.zones
            .lock()
            .unwrap()
            .insert(zone_name.to_string(), zone_id.to_string());
    }

    /// Rename the ID a zone resolves to
    pub fn rekey_zone(&self, zone_name: &str, zone_id: &str) {
        self.add_zone(zone_name, zone_id);
    }

    /// Insert a record directly, bypassing create_record()
    pub fn seed_record(&self, record: DnsRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(record.id.clone(), record);
    }

    /// Get a stored record
    pub fn stored(&self, record_id: &str) -> Option<DnsRecord> {
        self.records.lock().unwrap().get(record_id).cloned()
    }

    /// Number of stored records
    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Last update payload
    pub fn last_update(&self) -> Option<DnsRecord> {
        self.last_update.lock().unwrap().clone()
    }

    pub fn return_empty_id_on_create(&self) {
        self.empty_id_on_create.store(true, Ordering::SeqCst);
    }

    pub fn take_down(&self) {
        self.remote_down.store(true, Ordering::SeqCst);
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    fn check_up(&self) -> Result<(), ClientError> {
        if self.remote_down.load(Ordering::SeqCst) {
            Err(ClientError::server("503 Service Unavailable"))
        } else {
            Ok(())
        }
    }

    fn stored_in_zone(&self, zone_id: &str, record_id: &str) -> Result<DnsRecord, ClientError> {
        self.records
            .lock()
            .unwrap()
            .get(record_id)
            .filter(|r| r.zone_id == zone_id)
            .cloned()
            .ok_or_else(|| ClientError::not_found(format!("DNS record not found: {}", record_id)))
    }
}

#[async_trait::async_trait]
impl DnsClient for MockDnsClient {
    async fn zone_id_by_name(&self, zone_name: &str) -> Result<String, ClientError> {
        self.calls.zone_lookups.fetch_add(1, Ordering::SeqCst);
        self.zones
            .lock()
            .unwrap()
            .get(zone_name)
            .cloned()
            .ok_or_else(|| ClientError::not_found(format!("Zone not found: {}", zone_name)))
    }

    async fn create_record(
        &self,
        zone_id: &str,
        record: &DnsRecord,
    ) -> Result<DnsRecord, ClientError> {
        self.calls.creates.fetch_add(1, Ordering::SeqCst);
        self.check_up()?;

        let id = format!("R{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let stored = DnsRecord {
            id: id.clone(),
            zone_id: zone_id.to_string(),
            ttl: Some(record.ttl.unwrap_or(SERVICE_DEFAULT_TTL)),
            ..record.clone()
        };
        self.seed_record(stored.clone());

        if self.empty_id_on_create.load(Ordering::SeqCst) {
            return Ok(DnsRecord {
                id: String::new(),
                ..stored
            });
        }
        Ok(stored)
    }

    async fn get_record(&self, zone_id: &str, record_id: &str) -> Result<DnsRecord, ClientError> {
        self.calls.gets.fetch_add(1, Ordering::SeqCst);
        self.check_up()?;
        self.stored_in_zone(zone_id, record_id)
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        record: &DnsRecord,
    ) -> Result<(), ClientError> {
        self.calls.updates.fetch_add(1, Ordering::SeqCst);
        self.check_up()?;
        self.stored_in_zone(zone_id, record_id)?;

        *self.last_update.lock().unwrap() = Some(record.clone());
        self.seed_record(DnsRecord {
            id: record_id.to_string(),
            zone_id: zone_id.to_string(),
            ttl: Some(record.ttl.unwrap_or(SERVICE_DEFAULT_TTL)),
            ..record.clone()
        });
        Ok(())
    }

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<(), ClientError> {
        self.calls.deletes.fetch_add(1, Ordering::SeqCst);
        self.check_up()?;
        self.stored_in_zone(zone_id, record_id)?;
        self.records.lock().unwrap().remove(record_id);
        Ok(())
    }

    async fn list_records(
        &self,
        zone_id: &str,
        filter: &RecordFilter,
    ) -> Result<Vec<DnsRecord>, ClientError> {
        self.calls.lists.fetch_add(1, Ordering::SeqCst);
        self.check_up()?;
        let mut records: Vec<DnsRecord> = self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.zone_id == zone_id && filter.matches(r))
            .cloned()
            .collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    fn client_name(&self) -> &'static str {
        "mock"
    }
}

/// Build a mock serving example.com as zone Z1, and a resource bound to it
pub fn example_setup() -> (Arc<MockDnsClient>, RecordResource) {
    let client = Arc::new(MockDnsClient::new("example.com", "Z1"));
    let resource = RecordResource::new(client.clone());
    (client, resource)
}

/// Declaration of an A record `www` in example.com
pub fn www_a_record() -> ResourceState {
    ResourceState::new("example.com", "www", "A", "203.0.113.5")
}
