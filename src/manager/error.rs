use std::error::Error;
use std::fmt;

use crate::driver::DriverError;

/// Error type for Manager operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagerError {
    /// No configmap with this name or ID.
    NotFound(String),
    /// A configmap with this name already exists.
    NameConflict(String),
    /// An ID prefix matches more than one configmap.
    Ambiguous(String),
    /// The name is empty, too long or contains disallowed characters.
    InvalidName(String),
    /// No driver is registered under this name.
    UnknownDriver(String),
    /// The payload exceeds the size limit.
    PayloadTooLarge { size: usize, limit: usize },
    /// A driver call failed.
    Driver {
        operation: &'static str,
        id: String,
        source: DriverError,
    },
    /// Reading or writing the metadata file failed.
    Metadata(String),
    /// The index lock was poisoned.
    LockPoisoned(&'static str),
}

impl fmt::Display for ManagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManagerError::NotFound(name_or_id) => {
                write!(f, "no configmap with name or id {:?}: no such configmap", name_or_id)
            }
            ManagerError::NameConflict(name) => {
                write!(f, "{:?}: configmap name in use", name)
            }
            ManagerError::Ambiguous(prefix) => {
                write!(f, "more than one configmap matches id prefix {:?}", prefix)
            }
            ManagerError::InvalidName(name) => write!(f, "invalid configmap name {:?}", name),
            ManagerError::UnknownDriver(driver) => write!(f, "unknown driver {:?}", driver),
            ManagerError::PayloadTooLarge { size, limit } => write!(
                f,
                "configmap data is {} bytes, larger than the {} byte limit",
                size, limit
            ),
            ManagerError::Driver {
                operation,
                id,
                source,
            } => write!(f, "error {} configmap {}: {}", operation, id, source),
            ManagerError::Metadata(msg) => write!(f, "configmap metadata error: {}", msg),
            ManagerError::LockPoisoned(operation) => {
                write!(f, "configmap index lock poisoned during {}", operation)
            }
        }
    }
}

impl Error for ManagerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ManagerError::Driver { source, .. } => Some(source),
            _ => None,
        }
    }
}
