// # State File
//
// JSON file holding one persisted resource instance, used by drivers that
// stand in for the orchestrator's own state storage.
//
// ## Crash Recovery
//
// - Atomic writes: Uses write-then-rename
// - Automatic backup: Keeps .backup of the previous state
// - Recovery: Falls back to the backup if the main file fails to parse
//
// ## File Format
//
// ```json
// {
//   "version": "1.0",
//   "resource": "dns_record",
//   "instance": {
//     "schema_version": 1,
//     "id": "372e67954025e0ba6aaa6d586b9e0b59",
//     "attributes": {
//       "domain": "example.com",
//       "name": "www",
//       "type": "A",
//       "value": "203.0.113.5"
//     }
//   }
// }
// ```

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::InstanceState;
use crate::Error;

/// State file format version
const STATE_FILE_VERSION: &str = "1.0";

/// Resource kind recorded in the file
const RESOURCE_KIND: &str = "dns_record";

/// Serializable state file format
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct StateFileFormat {
    version: String,
    resource: String,
    instance: InstanceState,
}

/// File-backed storage for a single resource instance
///
/// A missing file loads as an empty instance.
///
/// # Example
///
/// ```rust,no_run
/// use record_core::state::{InstanceState, StateFile};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let file = StateFile::new("/var/lib/recordctl/www.json").await?;
///
///     let mut instance = file.load().await?;
///     instance.set("value", "203.0.113.7");
///     file.save(&instance).await?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    /// Open a state file, creating parent directories if needed
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::config(format!(
                    "Failed to create state directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        Ok(Self { path })
    }

    /// Path of the main state file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the instance, recovering from the backup if the file is corrupted
    pub async fn load(&self) -> Result<InstanceState, Error> {
        match Self::read_instance(&self.path).await {
            Ok(instance) => Ok(instance),
            Err(Error::Json(e)) => {
                tracing::warn!(
                    "State file {} appears corrupted: {}. Attempting recovery from backup.",
                    self.path.display(),
                    e
                );

                let backup_path = Self::backup_path(&self.path);
                if !backup_path.exists() {
                    return Err(Error::state(format!(
                        "state file {} is corrupted and no backup exists",
                        self.path.display()
                    )));
                }

                let instance = Self::read_instance(&backup_path).await?;
                fs::copy(&backup_path, &self.path).await?;
                tracing::info!("Recovered state from backup {}", backup_path.display());
                Ok(instance)
            }
            Err(e) => Err(e),
        }
    }

    /// Write the instance atomically, keeping the previous file as a backup
    pub async fn save(&self, instance: &InstanceState) -> Result<(), Error> {
        let state_file = StateFileFormat {
            version: STATE_FILE_VERSION.to_string(),
            resource: RESOURCE_KIND.to_string(),
            instance: instance.clone(),
        };
        let json = serde_json::to_string_pretty(&state_file)?;

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(json.as_bytes()).await?;
            file.flush().await?;
        }

        if self.path.exists() {
            let backup_path = Self::backup_path(&self.path);
            if let Err(e) = fs::copy(&self.path, &backup_path).await {
                tracing::warn!("Failed to create backup: {}", e);
            }
        }

        fs::rename(&temp_path, &self.path).await?;

        tracing::trace!("State written to file: {}", self.path.display());
        Ok(())
    }

    async fn read_instance(path: &Path) -> Result<InstanceState, Error> {
        if !path.exists() {
            tracing::debug!("State file does not exist: {}", path.display());
            return Ok(InstanceState::default());
        }

        let content = fs::read_to_string(path).await?;
        let state_file: StateFileFormat = serde_json::from_str(&content)?;

        if state_file.version != STATE_FILE_VERSION {
            tracing::warn!(
                "State file version mismatch: expected {}, got {}. Attempting to load anyway.",
                STATE_FILE_VERSION,
                state_file.version
            );
        }
        if state_file.resource != RESOURCE_KIND {
            return Err(Error::state(format!(
                "state file {} holds a {:?} resource, expected {:?}",
                path.display(),
                state_file.resource,
                RESOURCE_KIND
            )));
        }

        Ok(state_file.instance)
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }

    fn backup_path(path: &Path) -> PathBuf {
        let mut backup = path.to_path_buf();
        backup.set_extension("backup");
        backup
    }
}
