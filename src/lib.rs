pub mod compat;
pub mod config;
pub mod driver;
pub mod engine;
pub mod entities;
pub mod filter;
pub mod manager;

#[cfg(feature = "http")]
pub mod server;

pub use compat::{to_compat, InfoReportCompat};
pub use config::{Config, ConfigError};
pub use driver::{Driver, DriverError, DriverRegistry, FileDriver, InMemoryDriver};
pub use engine::{
    partition, BatchResult, CallContext, Engine, EngineError, LocalEngine, Outcome, RemoteEngine,
    TransportError,
};
pub use entities::{
    ConfigMap, CreateOptions, CreateReport, DriverOptions, InfoReport, ListRequest,
    RemoveOptions, RemoveReport,
};
pub use filter::{Filter, FilterError};
pub use manager::{Manager, ManagerConfig, ManagerError};
