//! Record type and content validation
//!
//! Runs before any remote call so a bad declaration never reaches the
//! service. Every failure is an [`Error::Validation`] naming the field.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Record types accepted by the resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// IPv4 address
    A,
    /// IPv6 address
    Aaaa,
    /// Canonical name
    Cname,
    /// Free-form text
    Txt,
    /// Service locator
    Srv,
    /// Geographic location
    Loc,
    /// Mail exchanger
    Mx,
    /// Name server
    Ns,
    /// Sender policy framework
    Spf,
}

impl RecordType {
    /// All accepted record types, in the order they are listed to users
    pub const ALL: [RecordType; 9] = [
        RecordType::A,
        RecordType::Aaaa,
        RecordType::Cname,
        RecordType::Txt,
        RecordType::Srv,
        RecordType::Loc,
        RecordType::Mx,
        RecordType::Ns,
        RecordType::Spf,
    ];

    /// Wire name of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Txt => "TXT",
            RecordType::Srv => "SRV",
            RecordType::Loc => "LOC",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Spf => "SPF",
        }
    }

    /// Whether traffic for this type can be proxied
    pub fn is_proxiable(&self) -> bool {
        matches!(self, RecordType::A | RecordType::Aaaa | RecordType::Cname)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        RecordType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = RecordType::ALL.iter().map(RecordType::as_str).collect();
                Error::validation(
                    "type",
                    s,
                    format!("invalid type, valid types are {}", valid.join(", ")),
                )
            })
    }
}

/// Validate that a record type is known and may carry the proxied flag
pub fn validate_record_type(record_type: &str, proxied: bool) -> Result<RecordType> {
    let parsed: RecordType = record_type.parse()?;
    if proxied && !parsed.is_proxiable() {
        return Err(Error::validation(
            "type",
            record_type,
            format!("type {} cannot be proxied", parsed),
        ));
    }
    Ok(parsed)
}

/// Validate that a record value is acceptable for its declared type
///
/// Types without content rules (SRV, LOC, and unknown types) only need a
/// non-empty value; unknown types are rejected separately by
/// [`validate_record_type`].
pub fn validate_record_content(record_type: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(
            "value",
            value,
            format!("{} record value cannot be empty", record_type),
        ));
    }

    match record_type {
        "A" => {
            value.parse::<Ipv4Addr>().map_err(|_| {
                Error::validation("value", value, "A record must be a valid IPv4 address")
            })?;
        }
        "AAAA" => {
            value.parse::<Ipv6Addr>().map_err(|_| {
                Error::validation("value", value, "AAAA record must be a valid IPv6 address")
            })?;
        }
        "TXT" | "SPF" => {
            if let Some(ch) = value.chars().find(|c| !(c.is_ascii_graphic() || *c == ' ')) {
                return Err(Error::validation(
                    "value",
                    value,
                    format!(
                        "{} record must contain printable ASCII, found: {:?}",
                        record_type, ch
                    ),
                ));
            }
        }
        "CNAME" | "MX" | "NS" => {
            validate_hostname(value).map_err(|msg| {
                Error::validation(
                    "value",
                    value,
                    format!("{} record must point to a host name: {}", record_type, msg),
                )
            })?;
        }
        _ => {}
    }

    Ok(())
}

/// Check a host name against RFC 1035 label rules
///
/// A trailing dot is allowed. Wildcard labels (`*`) and leading underscores
/// (`_dmarc`) are accepted.
fn validate_hostname(host: &str) -> std::result::Result<(), String> {
    let name = host.strip_suffix('.').unwrap_or(host);
    if name.is_empty() {
        return Err("host name cannot be empty".to_string());
    }
    if name.len() > 253 {
        return Err(format!("host name too long (max 253 characters, got {})", name.len()));
    }

    for label in name.split('.') {
        if label.is_empty() {
            return Err("host name contains empty label".to_string());
        }
        if label == "*" {
            continue;
        }
        if label.len() > 63 {
            return Err(format!(
                "label too long (max 63 characters, got {})",
                label.len()
            ));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(format!("label '{}' cannot start or end with hyphen", label));
        }
        if let Some(ch) = label
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(format!("invalid character {:?} in label '{}'", ch, label));
        }
    }

    Ok(())
}
