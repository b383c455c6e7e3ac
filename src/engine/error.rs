//! Error types shared by the local and remote engines.

use std::error::Error;
use std::fmt;

use crate::entities::ErrorModel;
use crate::filter::FilterError;
use crate::manager::ManagerError;

/// Failure to complete an exchange with the server.
///
/// A transport error means the operation may not have reached the server at
/// all, as opposed to the server rejecting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The caller cancelled the call.
    Cancelled,
    /// The call's deadline passed before a response arrived.
    DeadlineExceeded,
    /// The server could not be reached.
    Connect(String),
    /// Any other request or response failure.
    Other(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Cancelled => write!(f, "request cancelled"),
            TransportError::DeadlineExceeded => write!(f, "request deadline exceeded"),
            TransportError::Connect(msg) => write!(f, "connection failed: {}", msg),
            TransportError::Other(msg) => write!(f, "request failed: {}", msg),
        }
    }
}

impl Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::DeadlineExceeded
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

/// Error type for engine operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// No configmap with this name or ID.
    NotFound(String),
    /// A configmap with this name already exists.
    NameConflict(String),
    /// The list filter has an unknown key or a bad pattern.
    InvalidFilter(String),
    /// The request itself is malformed or unacceptable.
    InvalidInput(String),
    /// The operation is not implemented (update).
    Unsupported(String),
    /// The remote call did not complete.
    Transport(TransportError),
    /// The remote server failed the request with an unclassified status.
    Server { status: u16, message: String },
    /// A 2xx response body could not be decoded.
    Decode(String),
    /// Storage failed below the Manager.
    Backend(ManagerError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::NotFound(name_or_id) => {
                write!(f, "no configmap with name or id {:?}: no such configmap", name_or_id)
            }
            EngineError::NameConflict(name) => write!(f, "{:?}: configmap name in use", name),
            EngineError::InvalidFilter(msg) => write!(f, "{}", msg),
            EngineError::InvalidInput(msg) => write!(f, "{}", msg),
            EngineError::Unsupported(msg) => write!(f, "{}", msg),
            EngineError::Transport(e) => write!(f, "transport error: {}", e),
            EngineError::Server { status, message } => {
                write!(f, "server error ({}): {}", status, message)
            }
            EngineError::Decode(msg) => write!(f, "decoding response: {}", msg),
            EngineError::Backend(e) => write!(f, "{}", e),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EngineError::Transport(e) => Some(e),
            EngineError::Backend(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ManagerError> for EngineError {
    fn from(err: ManagerError) -> Self {
        match err {
            ManagerError::NotFound(name_or_id) => EngineError::NotFound(name_or_id),
            ManagerError::NameConflict(name) => EngineError::NameConflict(name),
            ManagerError::InvalidName(_)
            | ManagerError::Ambiguous(_)
            | ManagerError::UnknownDriver(_)
            | ManagerError::PayloadTooLarge { .. } => EngineError::InvalidInput(err.to_string()),
            other => EngineError::Backend(other),
        }
    }
}

impl From<FilterError> for EngineError {
    fn from(err: FilterError) -> Self {
        EngineError::InvalidFilter(err.to_string())
    }
}

impl From<TransportError> for EngineError {
    fn from(err: TransportError) -> Self {
        EngineError::Transport(err)
    }
}

impl EngineError {
    /// Map this error to an HTTP status code.
    pub fn status_code(&self) -> u16 {
        match self {
            EngineError::NotFound(_) => 404,
            EngineError::NameConflict(_) => 409,
            EngineError::InvalidFilter(_) => 400,
            EngineError::InvalidInput(_) => 400,
            EngineError::Unsupported(_) => 501,
            EngineError::Transport(_) => 502,
            EngineError::Server { status, .. } => *status,
            EngineError::Decode(_) => 500,
            EngineError::Backend(_) => 500,
        }
    }

    /// Short classification carried in `ErrorModel::cause`.
    pub fn cause(&self) -> &'static str {
        match self {
            EngineError::NotFound(_) => ErrorModel::CAUSE_NOT_FOUND,
            EngineError::NameConflict(_) => ErrorModel::CAUSE_NAME_IN_USE,
            EngineError::InvalidFilter(_) => ErrorModel::CAUSE_INVALID_FILTER,
            EngineError::InvalidInput(_) => ErrorModel::CAUSE_BAD_PARAMETER,
            EngineError::Unsupported(_) => ErrorModel::CAUSE_UNSUPPORTED,
            _ => ErrorModel::CAUSE_INTERNAL,
        }
    }

    pub fn to_error_model(&self) -> ErrorModel {
        ErrorModel::new(self.cause(), self.to_string(), self.status_code())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::NotFound(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, EngineError::Transport(_))
    }

    /// Rebuild an error from a non-2xx response.
    ///
    /// `subject` is the name or ID the request was about; NotFound and
    /// NameConflict carry it so they compare equal to the local errors.
    pub fn from_response(status: u16, body: &[u8], subject: &str) -> Self {
        let model = serde_json::from_slice::<ErrorModel>(body).ok();
        let message = model
            .as_ref()
            .map(|m| m.message.clone())
            .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());
        let cause = model.as_ref().map(|m| m.cause.as_str()).unwrap_or_default();

        match status {
            404 => EngineError::NotFound(subject.to_string()),
            409 => EngineError::NameConflict(subject.to_string()),
            400 if cause == ErrorModel::CAUSE_INVALID_FILTER => EngineError::InvalidFilter(message),
            400 => EngineError::InvalidInput(message),
            501 => EngineError::Unsupported(message),
            status => EngineError::Server { status, message },
        }
    }
}
