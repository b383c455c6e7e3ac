use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::{ConfigMap, DriverOptions};

/// Options accepted by `Engine::create`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    /// Driver name; empty selects the configured default.
    pub driver: String,
    /// Driver options; empty selects the configured defaults.
    pub driver_options: DriverOptions,
}

impl CreateOptions {
    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = driver.into();
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.driver_options.insert(key.into(), value.into());
        self
    }
}

/// Result of a successful create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReport {
    #[serde(rename = "ID")]
    pub id: String,
}

/// Filters for `Engine::list`, keyed by filter name (`name`, `id`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRequest {
    pub filters: HashMap<String, Vec<String>>,
}

impl ListRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pattern for `key`. Patterns under the same key are alternatives.
    pub fn filter(mut self, key: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.filters
            .entry(key.into())
            .or_default()
            .push(pattern.into());
        self
    }
}

/// Options accepted by `Engine::remove`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveOptions {
    /// Remove every configmap present when the removal starts.
    pub all: bool,
}

/// A removed configmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveReport {
    #[serde(rename = "ID")]
    pub id: String,
}

/// Inspect/list view of a configmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InfoReport {
    #[serde(rename = "ID")]
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub spec: InfoSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InfoSpec {
    pub name: String,
    pub driver: DriverSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DriverSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub options: DriverOptions,
}

impl From<&ConfigMap> for InfoReport {
    fn from(record: &ConfigMap) -> Self {
        InfoReport {
            id: record.id.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at(),
            spec: InfoSpec {
                name: record.name.clone(),
                driver: DriverSpec {
                    name: record.driver.clone(),
                    options: record.driver_options.clone(),
                },
            },
        }
    }
}

impl InfoReport {
    pub fn name(&self) -> &str {
        &self.spec.name
    }
}
