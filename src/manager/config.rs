use std::path::PathBuf;

use crate::driver::FILE_DRIVER;
use crate::entities::DriverOptions;

/// Manager defaults, applied when a create leaves driver settings empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Root of configmap storage. Holds the metadata file of a persistent
    /// manager and the default file-driver directories.
    pub configmaps_dir: PathBuf,
    /// Driver used when a create names none.
    pub default_driver: String,
    /// Options used when a create passes none.
    pub default_driver_options: DriverOptions,
}

impl ManagerConfig {
    pub fn new(configmaps_dir: impl Into<PathBuf>) -> Self {
        ManagerConfig {
            configmaps_dir: configmaps_dir.into(),
            default_driver: FILE_DRIVER.to_string(),
            default_driver_options: DriverOptions::new(),
        }
    }

    pub fn with_default_driver(mut self, driver: impl Into<String>) -> Self {
        self.default_driver = driver.into();
        self
    }

    pub fn with_default_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_driver_options.insert(key.into(), value.into());
        self
    }
}
