//! InMemoryDriver - HashMap-backed payload storage for testing and ephemeral use.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{Driver, DriverError};
use crate::entities::DriverOptions;

/// In-memory payload store. Options are ignored.
///
/// Clone-friendly via Arc: clones share the same storage.
#[derive(Clone, Default)]
pub struct InMemoryDriver {
    payloads: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of payloads currently held.
    pub fn len(&self) -> usize {
        self.payloads.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Driver for InMemoryDriver {
    fn put(&self, _options: &DriverOptions, id: &str, payload: &[u8]) -> Result<(), DriverError> {
        let mut payloads = self
            .payloads
            .write()
            .map_err(|_| DriverError::LockPoisoned("put"))?;
        if payloads.contains_key(id) {
            return Err(DriverError::AlreadyExists(id.to_string()));
        }
        payloads.insert(id.to_string(), payload.to_vec());
        Ok(())
    }

    fn get(&self, _options: &DriverOptions, id: &str) -> Result<Vec<u8>, DriverError> {
        let payloads = self
            .payloads
            .read()
            .map_err(|_| DriverError::LockPoisoned("get"))?;
        payloads
            .get(id)
            .cloned()
            .ok_or_else(|| DriverError::NotFound(id.to_string()))
    }

    fn delete(&self, _options: &DriverOptions, id: &str) -> Result<(), DriverError> {
        let mut payloads = self
            .payloads
            .write()
            .map_err(|_| DriverError::LockPoisoned("delete"))?;
        payloads
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DriverError::NotFound(id.to_string()))
    }
}
