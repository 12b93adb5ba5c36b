// # Cloudflare DNS Client
//
// `DnsClient` implementation over the Cloudflare API v4.
//
// - One HTTP request per trait method, except paged record listings
// - No retry, backoff or caching; failures are returned to the caller
// - HTTP timeout configured (30 seconds by default)
// - Specific error kinds for HTTP status codes (401/403, 404, 409, 429, 5xx)
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output
// - Construction fails fast if the token is empty
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List Zones: GET `/zones?name=...`
// - Create DNS Record: POST `/zones/:zone_id/dns_records`
// - DNS Record Details: GET `/zones/:zone_id/dns_records/:record_id`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`
// - Delete DNS Record: DELETE `/zones/:zone_id/dns_records/:record_id`
// - List DNS Records: GET `/zones/:zone_id/dns_records?name=...&type=...&page=...`

mod types;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use record_core::config::ClientConfig;
use record_core::error::ClientError;
use record_core::traits::{DnsClient, DnsClientFactory, DnsRecord, RecordFilter};
use record_core::{Error, Result};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use types::{CloudflareDnsRecord, CloudflareRecordPayload, CloudflareResponse, CloudflareZone};

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Page size for record listings
const LIST_PAGE_SIZE: u32 = 100;

/// Name reported by [`DnsClient::client_name`]
const CLIENT_NAME: &str = "cloudflare";

/// Cloudflare DNS client
///
/// Cheap to share: the resource holds it behind an `Arc` and reqwest pools
/// connections internally.
pub struct CloudflareClient {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base URL without trailing slash
    base_url: String,

    /// HTTP client for API requests
    http: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareClient")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CloudflareClient {
    /// Create a new Cloudflare client
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:Read and DNS:Edit permissions
    /// - `base_url`: Optional API base URL override
    /// - `timeout`: Per-request timeout
    pub fn new(
        api_token: impl Into<String>,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = base_url
            .unwrap_or_else(|| CLOUDFLARE_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            api_token,
            base_url,
            http,
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
    }

    /// Send a request and unwrap the API envelope
    ///
    /// `what` names the target in not-found errors.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> std::result::Result<T, ClientError> {
        self.fetch(request, what).await?.into_result()
    }

    /// Send a request and return the raw envelope, including paging info
    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> std::result::Result<CloudflareResponse<T>, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::http(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(map_status(status, &error_text, what));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::invalid_response(format!("Failed to parse response: {}", e)))
    }
}

/// Map a non-success HTTP status to a client error
fn map_status(status: StatusCode, error_text: &str, what: &str) -> ClientError {
    match status.as_u16() {
        401 | 403 => ClientError::auth(format!(
            "Invalid API token or insufficient permissions. Status: {}",
            status
        )),
        404 => ClientError::not_found(what.to_string()),
        409 => ClientError::conflict(format!(
            "Record is being updated by another process. Status: {}",
            status
        )),
        429 => ClientError::rate_limited(format!(
            "Rate limit exceeded. Please retry later. Status: {}",
            status
        )),
        500..=599 => ClientError::server(format!("{} - {}", status, error_text)),
        _ => ClientError::api(CLIENT_NAME, format!("{} - {}", status, error_text)),
    }
}

#[async_trait]
impl DnsClient for CloudflareClient {
    async fn zone_id_by_name(&self, zone_name: &str) -> std::result::Result<String, ClientError> {
        tracing::debug!("Looking up zone ID for domain: {}", zone_name);

        let what = format!("Zone not found: {}", zone_name);
        let zones: Vec<CloudflareZone> = self
            .send(
                self.request(reqwest::Method::GET, "/zones")
                    .query(&[("name", zone_name)]),
                &what,
            )
            .await?;

        let zone = zones
            .into_iter()
            .find(|z| z.name == zone_name)
            .ok_or_else(|| ClientError::not_found(what))?;

        tracing::debug!("Found zone ID: {}", zone.id);
        Ok(zone.id)
    }

    async fn create_record(
        &self,
        zone_id: &str,
        record: &DnsRecord,
    ) -> std::result::Result<DnsRecord, ClientError> {
        let path = format!("/zones/{}/dns_records", zone_id);
        let created: CloudflareDnsRecord = self
            .send(
                self.request(reqwest::Method::POST, &path)
                    .json(&CloudflareRecordPayload::from(record)),
                &format!("Zone not found: {}", zone_id),
            )
            .await?;

        Ok(created.into_record(zone_id))
    }

    async fn get_record(&self, zone_id: &str, record_id: &str) -> std::result::Result<DnsRecord, ClientError> {
        let path = format!("/zones/{}/dns_records/{}", zone_id, record_id);
        let record: CloudflareDnsRecord = self
            .send(
                self.request(reqwest::Method::GET, &path),
                &format!("DNS record not found: {}", record_id),
            )
            .await?;

        Ok(record.into_record(zone_id))
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        record: &DnsRecord,
    ) -> std::result::Result<(), ClientError> {
        let path = format!("/zones/{}/dns_records/{}", zone_id, record_id);
        let _: serde_json::Value = self
            .send(
                self.request(reqwest::Method::PUT, &path)
                    .json(&CloudflareRecordPayload::from(record)),
                &format!("DNS record not found: {}", record_id),
            )
            .await?;

        tracing::debug!("DNS record updated: {}", record_id);
        Ok(())
    }

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> std::result::Result<(), ClientError> {
        let path = format!("/zones/{}/dns_records/{}", zone_id, record_id);
        let _: serde_json::Value = self
            .send(
                self.request(reqwest::Method::DELETE, &path),
                &format!("DNS record not found: {}", record_id),
            )
            .await?;

        tracing::debug!("DNS record deleted: {}", record_id);
        Ok(())
    }

    async fn list_records(
        &self,
        zone_id: &str,
        filter: &RecordFilter,
    ) -> std::result::Result<Vec<DnsRecord>, ClientError> {
        let path = format!("/zones/{}/dns_records", zone_id);

        let mut query = vec![("per_page", LIST_PAGE_SIZE.to_string())];
        if let Some(name) = &filter.name {
            query.push(("name", name.clone()));
        }
        if let Some(record_type) = &filter.record_type {
            query.push(("type", record_type.clone()));
        }

        let what = format!("Zone not found: {}", zone_id);
        let mut records = Vec::new();
        let mut page: u32 = 1;
        loop {
            let envelope: CloudflareResponse<Vec<CloudflareDnsRecord>> = self
                .fetch(
                    self.request(reqwest::Method::GET, &path)
                        .query(&query)
                        .query(&[("page", page)]),
                    &what,
                )
                .await?;

            let total_pages = envelope.result_info.as_ref().map_or(1, |info| info.total_pages);
            let batch = envelope.into_result()?;
            if batch.is_empty() && page > 1 {
                break;
            }
            records.extend(batch);

            if page >= total_pages {
                break;
            }
            page += 1;
        }

        tracing::debug!("Listed {} record(s) in zone {}", records.len(), zone_id);
        Ok(records
            .into_iter()
            .map(|r| r.into_record(zone_id))
            .filter(|r| filter.matches(r))
            .collect())
    }

    fn client_name(&self) -> &'static str {
        CLIENT_NAME
    }
}

/// Factory for creating Cloudflare clients
pub struct CloudflareFactory;

impl DnsClientFactory for CloudflareFactory {
    fn create(&self, config: &ClientConfig) -> Result<Arc<dyn DnsClient>> {
        match config {
            ClientConfig::Cloudflare {
                api_token,
                base_url,
                timeout_secs,
            } => {
                if api_token.is_empty() {
                    return Err(Error::config("Cloudflare API token is required"));
                }

                Ok(Arc::new(CloudflareClient::new(
                    api_token.clone(),
                    base_url.clone(),
                    Duration::from_secs(*timeout_secs),
                )?))
            }
            _ => Err(Error::config("Invalid config for Cloudflare client")),
        }
    }
}

/// Register the Cloudflare client with a registry
///
/// # Example
///
/// ```rust
/// use record_core::ClientRegistry;
///
/// let registry = ClientRegistry::new();
/// record_client_cloudflare::register(&registry);
/// assert!(registry.has_client("cloudflare"));
/// ```
pub fn register(registry: &record_core::ClientRegistry) {
    registry.register_client(CLIENT_NAME, Box::new(CloudflareFactory));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> CloudflareClient {
        CloudflareClient::new("test_token", None, Duration::from_secs(30)).unwrap()
    }

    #[test]
    fn test_factory_creation() {
        let factory = CloudflareFactory;
        let client = factory.create(&ClientConfig::cloudflare("test_token")).unwrap();
        assert_eq!(client.client_name(), "cloudflare");
    }

    #[test]
    fn test_factory_missing_token() {
        let factory = CloudflareFactory;
        assert!(factory.create(&ClientConfig::cloudflare("")).is_err());
    }

    #[test]
    fn test_factory_rejects_foreign_config() {
        let config = ClientConfig::Custom {
            factory: "other".to_string(),
            config: serde_json::json!({}),
        };
        assert!(CloudflareFactory.create(&config).is_err());
    }

    #[test]
    fn test_empty_token_is_config_error() {
        let err = CloudflareClient::new("", None, Duration::from_secs(30)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_base_url() {
        assert_eq!(client().base_url(), CLOUDFLARE_API_BASE);

        let custom = CloudflareClient::new(
            "test_token",
            Some("http://127.0.0.1:8080/client/v4/".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(custom.url("/zones"), "http://127.0.0.1:8080/client/v4/zones");
    }

    #[test]
    fn test_api_token_not_exposed_in_debug() {
        let client = CloudflareClient::new("secret_token_12345", None, Duration::from_secs(30)).unwrap();

        let debug_str = format!("{:?}", client);
        assert!(!debug_str.contains("secret_token_12345"));
        assert!(debug_str.contains("CloudflareClient"));
    }

    #[test]
    fn test_status_mapping() {
        let map = |code: u16| map_status(StatusCode::from_u16(code).unwrap(), "body", "DNS record not found: R1");

        assert!(matches!(map(401), ClientError::Authentication(_)));
        assert!(matches!(map(403), ClientError::Authentication(_)));
        assert!(matches!(map(404), ClientError::NotFound(ref m) if m == "DNS record not found: R1"));
        assert!(matches!(map(409), ClientError::Conflict(_)));
        assert!(matches!(map(429), ClientError::RateLimited(_)));
        assert!(matches!(map(502), ClientError::Server(_)));
        assert!(matches!(map(400), ClientError::Api { .. }));
    }

    #[test]
    fn test_register() {
        let registry = record_core::ClientRegistry::new();
        register(&registry);
        assert!(registry.has_client("cloudflare"));

        let client = registry
            .create_client(&ClientConfig::cloudflare("test_token"))
            .unwrap();
        assert_eq!(client.client_name(), "cloudflare");
    }
}
