//! Driver backends: pluggable payload storage keyed by driver name.
//!
//! The Manager never touches payload bytes directly. Each configmap names a
//! driver, and the driver receives the configmap's options with every call,
//! so one driver instance can serve configmaps stored in different places.
//!
//! ## Example
//!
//! ```ignore
//! use configmaps::driver::{DriverRegistry, InMemoryDriver};
//!
//! let drivers = DriverRegistry::new()
//!     .register("memory", InMemoryDriver::new());
//! ```

mod error;
mod file;
mod in_memory;
mod registry;

use crate::entities::DriverOptions;

pub use error::DriverError;
pub use file::{FileDriver, PATH_OPTION};
pub use in_memory::InMemoryDriver;
pub use registry::DriverRegistry;

/// Name of the default unencrypted file driver.
pub const FILE_DRIVER: &str = "file";

/// Name under which `InMemoryDriver` is registered by default.
pub const MEMORY_DRIVER: &str = "memory";

/// Payload storage for configmaps.
///
/// A payload is addressed by the configmap ID together with the options the
/// configmap was created with.
pub trait Driver: Send + Sync {
    /// Store `payload` under `id`. Fails if `id` already holds a payload.
    fn put(&self, options: &DriverOptions, id: &str, payload: &[u8]) -> Result<(), DriverError>;

    /// Read the payload stored under `id`.
    fn get(&self, options: &DriverOptions, id: &str) -> Result<Vec<u8>, DriverError>;

    /// Remove the payload stored under `id`.
    fn delete(&self, options: &DriverOptions, id: &str) -> Result<(), DriverError>;
}
