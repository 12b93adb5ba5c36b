//! Cloudflare API v4 wire types

use record_core::error::ClientError;
use record_core::traits::DnsRecord;
use serde::{Deserialize, Serialize};

/// Common response envelope
#[derive(Debug, Deserialize)]
pub(crate) struct CloudflareResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<CloudflareApiError>,
    pub result: Option<T>,
    /// Paging information on list endpoints
    pub result_info: Option<CloudflareResultInfo>,
}

/// Paging information for list responses
#[derive(Debug, Deserialize)]
pub(crate) struct CloudflareResultInfo {
    #[serde(default = "first_page")]
    pub total_pages: u32,
}

fn first_page() -> u32 {
    1
}

impl<T> CloudflareResponse<T> {
    /// Unwrap the result, turning `success: false` into an API error
    pub fn into_result(self) -> Result<T, ClientError> {
        if !self.success {
            let message = self
                .errors
                .first()
                .map(|e| format!("{} (code {})", e.message, e.code))
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(ClientError::api("cloudflare", message));
        }

        self.result
            .ok_or_else(|| ClientError::invalid_response("response has no result"))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CloudflareApiError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CloudflareZone {
    pub id: String,
    pub name: String,
}

/// DNS record as returned by the API
#[derive(Debug, Deserialize)]
pub(crate) struct CloudflareDnsRecord {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: Option<u32>,
    pub priority: Option<u16>,
    #[serde(default)]
    pub proxied: bool,
    #[serde(default)]
    pub zone_name: String,
}

impl CloudflareDnsRecord {
    pub fn into_record(self, zone_id: &str) -> DnsRecord {
        DnsRecord {
            id: self.id,
            zone_id: zone_id.to_string(),
            zone_name: self.zone_name,
            record_type: self.record_type,
            name: self.name,
            content: self.content,
            ttl: self.ttl,
            priority: self.priority,
            proxied: self.proxied,
        }
    }
}

/// Request body for create and update
#[derive(Debug, Serialize)]
pub(crate) struct CloudflareRecordPayload<'a> {
    #[serde(rename = "type")]
    pub record_type: &'a str,
    pub name: &'a str,
    pub content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    pub proxied: bool,
}

impl<'a> From<&'a DnsRecord> for CloudflareRecordPayload<'a> {
    fn from(record: &'a DnsRecord) -> Self {
        Self {
            record_type: &record.record_type,
            name: &record.name,
            content: &record.content,
            ttl: record.ttl,
            priority: record.priority,
            proxied: record.proxied,
        }
    }
}
