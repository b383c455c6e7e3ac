//! Process configuration, read from `CONFIGMAPS_*` environment variables.
//!
//! | Variable | Field | Default |
//! |---|---|---|
//! | `CONFIGMAPS_ROOT` | `root` | `$XDG_DATA_HOME/configmaps`, `~/.local/share/configmaps` or `/var/lib/configmaps` |
//! | `CONFIGMAPS_DRIVER` | `default_driver` | `file` |
//! | `CONFIGMAPS_URL` | `url` | unset (local mode) |
//! | `CONFIGMAPS_BIND` | `bind` | `127.0.0.1:8080` |
//! | `CONFIGMAPS_TIMEOUT_MS` | `timeout` | unset (no deadline) |

use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::driver::{DriverRegistry, FILE_DRIVER};
use crate::engine::{CallContext, Engine, EngineError, LocalEngine, RemoteEngine};
use crate::manager::{Manager, ManagerConfig};

pub const ENV_ROOT: &str = "CONFIGMAPS_ROOT";
pub const ENV_DRIVER: &str = "CONFIGMAPS_DRIVER";
pub const ENV_URL: &str = "CONFIGMAPS_URL";
pub const ENV_BIND: &str = "CONFIGMAPS_BIND";
pub const ENV_TIMEOUT_MS: &str = "CONFIGMAPS_TIMEOUT_MS";

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { var, value, reason } => {
                write!(f, "invalid {}={:?}: {}", var, value, reason)
            }
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Storage root: the metadata file and default file-driver directories.
    pub root: PathBuf,
    pub default_driver: String,
    /// Server URL. When set, commands run against a remote engine.
    pub url: Option<String>,
    /// Listen address for `serve`.
    pub bind: String,
    /// Deadline applied to each remote call.
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: default_root(|key| std::env::var(key).ok()),
            default_driver: FILE_DRIVER.to_string(),
            url: None,
            bind: DEFAULT_BIND.to_string(),
            timeout: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let timeout = match get(ENV_TIMEOUT_MS) {
            Some(raw) => {
                let millis = raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                    var: ENV_TIMEOUT_MS,
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
                Some(Duration::from_millis(millis))
            }
            None => None,
        };

        Ok(Self {
            root: get(ENV_ROOT)
                .map(PathBuf::from)
                .unwrap_or_else(|| default_root(&get)),
            default_driver: get(ENV_DRIVER).unwrap_or_else(|| FILE_DRIVER.to_string()),
            url: get(ENV_URL),
            bind: get(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string()),
            timeout,
        })
    }

    pub fn manager_config(&self) -> ManagerConfig {
        ManagerConfig::new(self.root.clone()).with_default_driver(self.default_driver.clone())
    }

    /// Open the local engine over `root`, ignoring `url`.
    pub fn local_engine(&self) -> Result<LocalEngine, EngineError> {
        let manager = Manager::open(self.manager_config(), DriverRegistry::default())?;
        Ok(LocalEngine::new(Arc::new(manager)))
    }

    /// The remote engine when `url` is set, otherwise the local one.
    pub fn connect(&self) -> Result<Arc<dyn Engine>, EngineError> {
        match &self.url {
            Some(url) => {
                tracing::debug!(%url, "using remote engine");
                Ok(Arc::new(RemoteEngine::new(url)?))
            }
            None => {
                tracing::debug!(root = %self.root.display(), "using local engine");
                Ok(Arc::new(self.local_engine()?))
            }
        }
    }

    /// A fresh call context carrying the configured deadline.
    pub fn call_context(&self) -> CallContext {
        match self.timeout {
            Some(timeout) => CallContext::with_timeout(timeout),
            None => CallContext::background(),
        }
    }
}

fn default_root<F>(get: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(data_home) = get("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(data_home).join("configmaps");
    }
    if let Some(home) = get("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".local/share/configmaps");
    }
    PathBuf::from("/var/lib/configmaps")
}
