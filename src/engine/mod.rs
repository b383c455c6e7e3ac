//! Engine: the configmap operations, in process or over HTTP.
//!
//! `Engine` is the single contract callers program against. `LocalEngine`
//! calls a `Manager` directly; `RemoteEngine` sends each operation to a
//! server that hosts a `LocalEngine` and decodes the reply. Both classify
//! failures the same way, so callers cannot tell them apart except that only
//! the remote engine can fail with `EngineError::Transport`.
//!
//! ## Batch results
//!
//! `inspect` and `remove` act on several configmaps at once. A missing
//! configmap does not stop the batch: its slot becomes `Outcome::NotFound`.
//! Any other failure aborts the whole call and discards the slots already
//! filled.
//!
//! ```ignore
//! let outcomes = engine.remove(&ctx, &names, RemoveOptions::default()).await?;
//! for outcome in outcomes {
//!     match outcome {
//!         Outcome::Ok(report) => println!("{}", report.id),
//!         Outcome::NotFound(name) => eprintln!("no such configmap {name}"),
//!     }
//! }
//! ```

mod context;
mod error;
mod local;
mod remote;

use std::io::Read;

use async_trait::async_trait;

use crate::entities::{
    CreateOptions, CreateReport, InfoReport, ListRequest, RemoveOptions, RemoveReport,
};

pub use context::CallContext;
pub use error::{EngineError, TransportError};
pub use local::LocalEngine;
pub use remote::RemoteEngine;

/// One slot of a batch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Ok(T),
    /// The requested name or ID did not exist.
    NotFound(String),
}

impl<T> Outcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    pub fn as_ok(&self) -> Option<&T> {
        match self {
            Outcome::Ok(value) => Some(value),
            Outcome::NotFound(_) => None,
        }
    }

    /// Convert to a `Result`, turning `NotFound` into `EngineError::NotFound`.
    pub fn into_result(self) -> Result<T, EngineError> {
        match self {
            Outcome::Ok(value) => Ok(value),
            Outcome::NotFound(name_or_id) => Err(EngineError::NotFound(name_or_id)),
        }
    }
}

/// Either every slot of a batch, or the single error that aborted it.
pub type BatchResult<T> = Result<Vec<Outcome<T>>, EngineError>;

/// Split batch slots into successes and the errors for the missing items.
pub fn partition<T>(outcomes: Vec<Outcome<T>>) -> (Vec<T>, Vec<EngineError>) {
    let mut found = Vec::new();
    let mut missing = Vec::new();
    for outcome in outcomes {
        match outcome.into_result() {
            Ok(value) => found.push(value),
            Err(err) => missing.push(err),
        }
    }
    (found, missing)
}

/// The configmap operations.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Read `data` to the end and store it as configmap `name`.
    async fn create(
        &self,
        ctx: &CallContext,
        name: &str,
        data: &mut (dyn Read + Send),
        options: CreateOptions,
    ) -> Result<CreateReport, EngineError>;

    /// Inspect each name or ID, in order.
    async fn inspect(&self, ctx: &CallContext, names_or_ids: &[String]) -> BatchResult<InfoReport>;

    /// List configmaps passing `request`'s filters, in creation order.
    async fn list(
        &self,
        ctx: &CallContext,
        request: &ListRequest,
    ) -> Result<Vec<InfoReport>, EngineError>;

    /// Remove the named configmaps, or every configmap when `options.all` is set.
    ///
    /// With `all`, the targets are the configmaps present when the call
    /// lists them; `names_or_ids` is ignored.
    async fn remove(
        &self,
        ctx: &CallContext,
        names_or_ids: &[String],
        options: RemoveOptions,
    ) -> BatchResult<RemoveReport>;

    /// Configmaps are immutable: always `EngineError::Unsupported`.
    async fn update(&self, ctx: &CallContext, name: &str, data: &[u8])
        -> Result<(), EngineError>;
}
