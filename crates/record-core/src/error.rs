//! Error types for the DNS record resource
//!
//! Two layers of errors live here:
//!
//! - [`ClientError`]: what a [`DnsClient`](crate::traits::DnsClient) reports
//!   when a remote call fails.
//! - [`Error`]: what the resource lifecycle surfaces to the orchestrator. Remote
//!   failures are wrapped with the operation that triggered them.

use thiserror::Error;

/// Result type alias for resource operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by a remote DNS client
#[derive(Error, Debug)]
pub enum ClientError {
    /// Zone or record does not exist on the remote service
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid credentials or insufficient permissions
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Remote rate limit hit
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Concurrent modification on the remote side
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Transient server-side failure
    #[error("Server error (transient): {0}")]
    Server(String),

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response could not be understood, or was degenerate
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// API-level failure reported by the client
    #[error("API error ({client}): {message}")]
    Api {
        /// Client name
        client: String,
        /// Error message
        message: String,
    },
}

impl ClientError {
    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create a transient server error
    pub fn server(msg: impl Into<String>) -> Self {
        Self::Server(msg.into())
    }

    /// Create a transport error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an invalid response error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Create a client-specific API error
    pub fn api(client: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            client: client.into(),
            message: message.into(),
        }
    }

    /// Whether the remote service reported the target as absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Core error type for the record resource
#[derive(Error, Debug)]
pub enum Error {
    /// Record type or value rejected before any remote call
    #[error("Error validating record {field} {value:?}: {message}")]
    Validation {
        /// Offending field name
        field: &'static str,
        /// Offending value
        value: String,
        /// Why it was rejected
        message: String,
    },

    /// Domain has no matching zone on the remote service
    #[error("Error finding zone {domain:?}: {source}")]
    ZoneLookup {
        /// Zone name that was looked up
        domain: String,
        /// Underlying client failure
        #[source]
        source: ClientError,
    },

    /// Remote call failed
    #[error("{context}: {source}")]
    Remote {
        /// Operation that failed
        context: String,
        /// Underlying client failure
        #[source]
        source: ClientError,
    },

    /// Resource state could not be interpreted
    #[error("Invalid resource state: {0}")]
    State(String),

    /// Schema-version upgrade failed
    #[error("State migration failed: {0}")]
    Migration(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a validation error naming the offending field
    pub fn validation(
        field: &'static str,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Validation {
            field,
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create a zone lookup error
    pub fn zone_lookup(domain: impl Into<String>, source: ClientError) -> Self {
        Self::ZoneLookup {
            domain: domain.into(),
            source,
        }
    }

    /// Wrap a client failure with the operation that caused it
    pub fn remote(context: impl Into<String>, source: ClientError) -> Self {
        Self::Remote {
            context: context.into(),
            source,
        }
    }

    /// Create a state error
    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    /// Create a migration error
    pub fn migration(msg: impl Into<String>) -> Self {
        Self::Migration(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether a remote call reported the record as gone
    ///
    /// The orchestrator treats this as "resource no longer exists" rather than
    /// a failure. A missing zone is not covered: that stays an error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Remote { source, .. } if source.is_not_found())
    }
}
