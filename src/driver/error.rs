use std::fmt;

/// Error type for driver operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// No payload stored under this ID.
    NotFound(String),
    /// A payload is already stored under this ID.
    AlreadyExists(String),
    /// A required driver option was not supplied.
    MissingOption(String),
    /// The underlying storage failed.
    Io { operation: &'static str, message: String },
    /// An internal lock was poisoned.
    LockPoisoned(&'static str),
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::NotFound(id) => write!(f, "no payload stored for {}", id),
            DriverError::AlreadyExists(id) => write!(f, "payload already stored for {}", id),
            DriverError::MissingOption(option) => {
                write!(f, "missing required driver option {:?}", option)
            }
            DriverError::Io { operation, message } => {
                write!(f, "driver {} failed: {}", operation, message)
            }
            DriverError::LockPoisoned(operation) => {
                write!(f, "driver lock poisoned during {}", operation)
            }
        }
    }
}

impl std::error::Error for DriverError {}

impl DriverError {
    pub(crate) fn io(operation: &'static str, err: std::io::Error) -> Self {
        DriverError::Io {
            operation,
            message: err.to_string(),
        }
    }
}
