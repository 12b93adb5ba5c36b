//! Schema-version upgrades for persisted record state
//!
//! Version 0 keyed instances by an identifier that was not the remote record
//! ID. Upgrading finds the remote record that matches the stored hostname,
//! type and value, and re-keys the instance to its ID.

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::schema::SCHEMA_VERSION;
use crate::state::InstanceState;
use crate::traits::{DnsClient, RecordFilter};

/// Upgrade an instance persisted at `version` to the current layout
///
/// Empty instances pass through untouched.
pub async fn migrate_state(
    client: &dyn DnsClient,
    version: u32,
    instance: InstanceState,
) -> Result<InstanceState> {
    if instance.is_empty() {
        debug!("Empty record state; nothing to migrate");
        return Ok(instance);
    }

    match version {
        0 => {
            info!("Found record state v0; migrating to v1");
            migrate_v0_to_v1(client, instance).await
        }
        SCHEMA_VERSION => Ok(instance),
        other => Err(Error::migration(format!(
            "unexpected schema version: {}",
            other
        ))),
    }
}

async fn migrate_v0_to_v1(client: &dyn DnsClient, mut instance: InstanceState) -> Result<InstanceState> {
    debug!("Attributes before migration: {:?}", instance.attributes);

    let attribute = |key: &str| {
        instance
            .get(key)
            .map(str::to_string)
            .ok_or_else(|| Error::migration(format!("v0 state is missing attribute {}", key)))
    };
    let domain = attribute("domain")?;
    let hostname = attribute("hostname")?;
    let record_type = attribute("type")?;
    let value = attribute("value")?;

    let zone_id = client
        .zone_id_by_name(&domain)
        .await
        .map_err(|e| Error::zone_lookup(&domain, e))?;

    let filter = RecordFilter::new()
        .with_name(&hostname)
        .with_record_type(&record_type);
    let records = client
        .list_records(&zone_id, &filter)
        .await
        .map_err(|e| Error::remote(format!("Error fetching records in zone {:?}", domain), e))?;

    let matched = records
        .into_iter()
        .find(|r| r.name == hostname && r.record_type == record_type && r.content == value)
        .ok_or_else(|| {
            Error::migration(format!(
                "no matching record found for {} {} {:?}",
                hostname, record_type, value
            ))
        })?;

    info!("Re-keying record state {} -> {}", instance.id, matched.id);
    instance.id = matched.id;
    instance.set("zone_id", zone_id);
    instance.schema_version = SCHEMA_VERSION;

    debug!("Attributes after migration: {:?}", instance.attributes);
    Ok(instance)
}
