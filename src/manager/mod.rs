//! Manager: owner of the configmap index and dispatcher to drivers.
//!
//! The Manager is the only component that touches persistent storage. It
//! keeps the name/ID index, resolves driver defaults, and hands payloads to
//! the driver each configmap names.
//!
//! ## Example
//!
//! ```ignore
//! use configmaps::{DriverRegistry, Manager, ManagerConfig};
//!
//! let manager = Manager::open(ManagerConfig::new("/var/lib/configmaps"), DriverRegistry::default())?;
//! let id = manager.store("app", b"key=value", "", Default::default())?;
//! let (record, data) = manager.lookup_data("app")?;
//! manager.delete(&id)?;
//! ```
//!
//! ## Concurrency
//!
//! The index sits behind a `RwLock`. Lookups and listings share it. A store
//! first reserves its name under the write lock, so two creates of the same
//! name cannot both pass the uniqueness check; the payload is then written
//! with no index lock held, and the record is published afterwards.

mod config;
mod error;
mod index;
mod metadata;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use crate::driver::{Driver, DriverError, DriverRegistry, FILE_DRIVER, PATH_OPTION};
use crate::entities::{ConfigMap, DriverOptions};
use index::Index;
use metadata::MetadataFile;

pub use config::ManagerConfig;
pub use error::ManagerError;

/// Largest accepted payload, in bytes.
pub const MAX_CONFIGMAP_SIZE: usize = 512_000;

/// Longest accepted name, in bytes.
pub const MAX_NAME_LENGTH: usize = 253;

/// Length of generated configmap IDs.
pub const ID_LENGTH: usize = 25;

/// Names taken by the static `/configmaps/json` and `/configmaps/create` routes.
pub const RESERVED_NAMES: [&str; 2] = ["json", "create"];

pub struct Manager {
    config: ManagerConfig,
    drivers: DriverRegistry,
    index: RwLock<Index>,
    metadata: Option<MetadataFile>,
}

impl Manager {
    /// Open a manager whose metadata lives in `config.configmaps_dir`.
    pub fn open(config: ManagerConfig, drivers: DriverRegistry) -> Result<Self, ManagerError> {
        let metadata = MetadataFile::in_dir(&config.configmaps_dir);
        let records = metadata.load()?;
        tracing::debug!(
            path = %metadata.path().display(),
            count = records.len(),
            "loaded configmap metadata"
        );
        Ok(Manager {
            config,
            drivers,
            index: RwLock::new(Index::from_records(records)),
            metadata: Some(metadata),
        })
    }

    /// A manager that keeps its metadata in memory only.
    pub fn ephemeral(config: ManagerConfig, drivers: DriverRegistry) -> Self {
        Manager {
            config,
            drivers,
            index: RwLock::new(Index::default()),
            metadata: None,
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn drivers(&self) -> &DriverRegistry {
        &self.drivers
    }

    /// Store a new configmap and return its generated ID.
    ///
    /// An empty `driver` or `driver_options` selects the configured defaults.
    pub fn store(
        &self,
        name: &str,
        data: &[u8],
        driver: &str,
        driver_options: DriverOptions,
    ) -> Result<String, ManagerError> {
        validate_name(name)?;
        if data.len() > MAX_CONFIGMAP_SIZE {
            return Err(ManagerError::PayloadTooLarge {
                size: data.len(),
                limit: MAX_CONFIGMAP_SIZE,
            });
        }
        let (driver_name, driver_options) = self.resolve_driver(driver, driver_options)?;
        let backend = self.driver(&driver_name)?;

        let id = {
            let mut index = self.write_index("store")?;
            if !index.reserve(name) {
                return Err(ManagerError::NameConflict(name.to_string()));
            }
            let mut id = generate_id();
            while index.contains_id(&id) {
                id = generate_id();
            }
            id
        };

        if let Err(source) = backend.put(&driver_options, &id, data) {
            self.write_index("store")?.release(name);
            return Err(ManagerError::Driver {
                operation: "storing",
                id,
                source,
            });
        }

        let record = ConfigMap {
            id: id.clone(),
            name: name.to_string(),
            driver: driver_name,
            driver_options,
            created_at: Utc::now(),
        };
        self.write_index("store")?.publish(record.clone());

        if let Err(err) = self.persist() {
            self.write_index("store rollback")?.remove(&id);
            if let Err(cleanup) = backend.delete(&record.driver_options, &id) {
                tracing::warn!(%id, error = %cleanup, "failed to remove payload after metadata error");
            }
            return Err(err);
        }

        tracing::info!(%id, name, driver = %record.driver, "stored configmap");
        Ok(id)
    }

    /// Find a configmap by name, full ID or unique ID prefix.
    pub fn lookup(&self, name_or_id: &str) -> Result<ConfigMap, ManagerError> {
        let index = self.read_index("lookup")?;
        index.resolve(name_or_id).cloned()
    }

    /// Find a configmap and read its payload back from the driver.
    pub fn lookup_data(&self, name_or_id: &str) -> Result<(ConfigMap, Vec<u8>), ManagerError> {
        let record = self.lookup(name_or_id)?;
        let backend = self.driver(&record.driver)?;
        let data = backend
            .get(&record.driver_options, &record.id)
            .map_err(|source| ManagerError::Driver {
                operation: "reading",
                id: record.id.clone(),
                source,
            })?;
        Ok((record, data))
    }

    /// All configmaps, in creation order.
    pub fn list(&self) -> Result<Vec<ConfigMap>, ManagerError> {
        Ok(self.read_index("list")?.records())
    }

    /// Delete a configmap's metadata and then its payload, returning its ID.
    ///
    /// The metadata goes first: a failed save restores the entry with its
    /// payload intact. A payload that cannot be removed afterwards is left
    /// behind as an unreferenced blob and logged.
    pub fn delete(&self, name_or_id: &str) -> Result<String, ManagerError> {
        let record = self.lookup(name_or_id)?;
        let backend = self.driver(&record.driver)?;

        // A concurrent delete may have removed it since the lookup.
        let (position, removed) = self
            .write_index("delete")?
            .remove(&record.id)
            .ok_or_else(|| ManagerError::NotFound(name_or_id.to_string()))?;

        if let Err(err) = self.persist() {
            tracing::error!(id = %removed.id, error = %err, "metadata not saved, keeping configmap");
            self.write_index("delete rollback")?
                .restore(position, removed);
            return Err(err);
        }

        match backend.delete(&record.driver_options, &record.id) {
            Ok(()) | Err(DriverError::NotFound(_)) => {}
            Err(err) => {
                tracing::warn!(id = %record.id, error = %err, "configmap deleted but payload left behind");
            }
        }

        tracing::info!(id = %record.id, name = %record.name, "deleted configmap");
        Ok(record.id)
    }

    fn resolve_driver(
        &self,
        driver: &str,
        driver_options: DriverOptions,
    ) -> Result<(String, DriverOptions), ManagerError> {
        let driver = if driver.is_empty() {
            self.config.default_driver.clone()
        } else {
            driver.to_string()
        };
        let mut options = if driver_options.is_empty() {
            self.config.default_driver_options.clone()
        } else {
            driver_options
        };
        if !self.drivers.contains(&driver) {
            return Err(ManagerError::UnknownDriver(driver));
        }
        if driver == FILE_DRIVER && !options.contains_key(PATH_OPTION) {
            let path = self.config.configmaps_dir.join(&driver);
            options.insert(PATH_OPTION.to_string(), path.to_string_lossy().into_owned());
        }
        Ok((driver, options))
    }

    fn driver(&self, name: &str) -> Result<Arc<dyn Driver>, ManagerError> {
        self.drivers
            .get(name)
            .ok_or_else(|| ManagerError::UnknownDriver(name.to_string()))
    }

    fn persist(&self) -> Result<(), ManagerError> {
        let Some(metadata) = &self.metadata else {
            return Ok(());
        };
        let _writer = metadata.lock()?;
        let snapshot = self.read_index("persist")?.records();
        metadata.save(snapshot)
    }

    fn read_index(&self, operation: &'static str) -> Result<RwLockReadGuard<'_, Index>, ManagerError> {
        self.index
            .read()
            .map_err(|_| ManagerError::LockPoisoned(operation))
    }

    fn write_index(
        &self,
        operation: &'static str,
    ) -> Result<RwLockWriteGuard<'_, Index>, ManagerError> {
        self.index
            .write()
            .map_err(|_| ManagerError::LockPoisoned(operation))
    }
}

fn generate_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(ID_LENGTH);
    id
}

/// `[a-zA-Z0-9][a-zA-Z0-9_.-]*`, at most `MAX_NAME_LENGTH` bytes, and not
/// one of `RESERVED_NAMES`.
fn validate_name(name: &str) -> Result<(), ManagerError> {
    let mut chars = name.chars();
    let valid_first = chars.next().is_some_and(|c| c.is_ascii_alphanumeric());
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    let reserved = RESERVED_NAMES.contains(&name);
    if !valid_first || !valid_rest || reserved || name.len() > MAX_NAME_LENGTH {
        return Err(ManagerError::InvalidName(name.to_string()));
    }
    Ok(())
}
