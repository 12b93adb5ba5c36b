//! Core traits for the record resource
//!
//! - [`DnsClient`]: Remote DNS service operations
//! - [`DnsClientFactory`]: Builds a client from configuration

pub mod dns_client;

pub use dns_client::{DnsClient, DnsClientFactory, DnsRecord, RecordFilter};
