//! JSON metadata file for persistent managers.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use super::error::ManagerError;
use crate::entities::ConfigMap;

pub(crate) const METADATA_FILE: &str = "configmaps.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct MetadataDocument {
    #[serde(default)]
    configmaps: Vec<ConfigMap>,
}

/// `<dir>/configmaps.json`, rewritten in full on every change.
#[derive(Debug)]
pub(crate) struct MetadataFile {
    path: PathBuf,
    writer: Mutex<()>,
}

impl MetadataFile {
    pub(crate) fn in_dir(dir: &Path) -> Self {
        MetadataFile {
            path: dir.join(METADATA_FILE),
            writer: Mutex::new(()),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Serializes writers so a newer snapshot is never overwritten by an older one.
    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, ()>, ManagerError> {
        self.writer
            .lock()
            .map_err(|_| ManagerError::LockPoisoned("metadata write"))
    }

    /// Missing file means no configmaps yet.
    pub(crate) fn load(&self) -> Result<Vec<ConfigMap>, ManagerError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ManagerError::Metadata(format!(
                    "reading {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        let document: MetadataDocument = serde_json::from_slice(&bytes).map_err(|e| {
            ManagerError::Metadata(format!("parsing {}: {}", self.path.display(), e))
        })?;
        Ok(document.configmaps)
    }

    /// Write to a temp file and rename over the old one.
    pub(crate) fn save(&self, records: Vec<ConfigMap>) -> Result<(), ManagerError> {
        let document = MetadataDocument {
            configmaps: records,
        };
        let bytes = serde_json::to_vec_pretty(&document)
            .map_err(|e| ManagerError::Metadata(format!("encoding metadata: {}", e)))?;

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| {
                ManagerError::Metadata(format!("creating {}: {}", dir.display(), e))
            })?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &bytes)
            .and_then(|_| fs::rename(&tmp, &self.path))
            .map_err(|e| {
                let _ = fs::remove_file(&tmp);
                ManagerError::Metadata(format!("writing {}: {}", self.path.display(), e))
            })
    }
}
