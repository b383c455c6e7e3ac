//! Entities: the shared record, report and request shapes.
//!
//! `ConfigMap` is the Manager's metadata record. The report types are what
//! engines hand back to callers; their serde representation is the wire
//! format spoken between `RemoteEngine` and the HTTP server, so field names
//! follow the external API (`ID`, `CreatedAt`, `Spec`, ...).

mod record;
mod reports;
mod wire;

pub use record::{ConfigMap, DriverOptions};
pub use reports::{
    CreateOptions, CreateReport, DriverSpec, InfoReport, InfoSpec, ListRequest, RemoveOptions,
    RemoveReport,
};
pub use wire::{CreateRequest, ErrorModel};
