use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{Driver, FileDriver, InMemoryDriver, FILE_DRIVER, MEMORY_DRIVER};

/// Name → driver table, built once when the Manager is constructed.
///
/// Uses builder pattern; `register` returns `self` for chaining.
#[derive(Clone)]
pub struct DriverRegistry {
    drivers: HashMap<String, Arc<dyn Driver>>,
}

impl DriverRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            drivers: HashMap::new(),
        }
    }

    /// Register (or replace) the driver for `name`.
    pub fn register<D: Driver + 'static>(mut self, name: &str, driver: D) -> Self {
        self.drivers.insert(name.to_string(), Arc::new(driver));
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Driver>> {
        self.drivers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.drivers.contains_key(name)
    }

    /// Registered driver names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.drivers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for DriverRegistry {
    /// The `file` and `memory` drivers.
    fn default() -> Self {
        DriverRegistry::new()
            .register(FILE_DRIVER, FileDriver::new())
            .register(MEMORY_DRIVER, InMemoryDriver::new())
    }
}

impl fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("drivers", &self.names())
            .finish()
    }
}
