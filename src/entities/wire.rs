use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::reports::DriverSpec;

/// Body of `POST /configmaps/create`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateRequest {
    /// User-defined name of the configmap.
    pub name: String,
    /// Standard base64 encoding of the payload.
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub driver: DriverSpec,
    /// Accepted for API compatibility; anything non-empty is rejected.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
}

/// Error body returned by the server for every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorModel {
    /// Short machine-oriented classification.
    pub cause: String,
    /// Human readable error text.
    pub message: String,
    /// HTTP status code repeated in the body.
    pub response: u16,
}

impl ErrorModel {
    pub const CAUSE_NOT_FOUND: &'static str = "no such configmap";
    pub const CAUSE_NAME_IN_USE: &'static str = "configmap name in use";
    pub const CAUSE_INVALID_FILTER: &'static str = "invalid filter";
    pub const CAUSE_BAD_PARAMETER: &'static str = "bad parameter";
    pub const CAUSE_UNSUPPORTED: &'static str = "not implemented";
    pub const CAUSE_INTERNAL: &'static str = "internal error";

    pub fn new(cause: &str, message: impl Into<String>, response: u16) -> Self {
        Self {
            cause: cause.to_string(),
            message: message.into(),
            response,
        }
    }
}
