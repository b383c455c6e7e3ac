use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Driver-specific options, opaque to the Manager.
pub type DriverOptions = BTreeMap<String, String>;

/// Metadata for a stored configmap.
///
/// The payload itself lives in the driver named by `driver`; this record only
/// carries what is needed to find it again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigMap {
    pub id: String,
    pub name: String,
    pub driver: String,
    #[serde(default)]
    pub driver_options: DriverOptions,
    pub created_at: DateTime<Utc>,
}

impl ConfigMap {
    /// Configmaps cannot be updated, so the last update is the creation.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
