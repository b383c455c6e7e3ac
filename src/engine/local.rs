//! LocalEngine - engine operations against an in-process Manager.

use std::io::Read;
use std::sync::Arc;

use async_trait::async_trait;

use super::{BatchResult, CallContext, Engine, EngineError, Outcome};
use crate::entities::{
    CreateOptions, CreateReport, InfoReport, ListRequest, RemoveOptions, RemoveReport,
};
use crate::filter::Filter;
use crate::manager::{Manager, ManagerError};

/// Calls the Manager directly, with no transport in between.
///
/// Clone-friendly: clones share the same Manager.
#[derive(Clone)]
pub struct LocalEngine {
    manager: Arc<Manager>,
}

impl LocalEngine {
    pub fn new(manager: Arc<Manager>) -> Self {
        LocalEngine { manager }
    }

    pub fn manager(&self) -> &Arc<Manager> {
        &self.manager
    }
}

#[async_trait]
impl Engine for LocalEngine {
    async fn create(
        &self,
        _ctx: &CallContext,
        name: &str,
        data: &mut (dyn Read + Send),
        options: CreateOptions,
    ) -> Result<CreateReport, EngineError> {
        let mut payload = Vec::new();
        data.read_to_end(&mut payload)
            .map_err(|e| EngineError::InvalidInput(format!("reading configmap data: {}", e)))?;

        let id = self
            .manager
            .store(name, &payload, &options.driver, options.driver_options)?;
        Ok(CreateReport { id })
    }

    async fn inspect(&self, _ctx: &CallContext, names_or_ids: &[String]) -> BatchResult<InfoReport> {
        let mut outcomes = Vec::with_capacity(names_or_ids.len());
        for name_or_id in names_or_ids {
            match self.manager.lookup(name_or_id) {
                Ok(record) => outcomes.push(Outcome::Ok(InfoReport::from(&record))),
                Err(ManagerError::NotFound(_)) => {
                    outcomes.push(Outcome::NotFound(name_or_id.clone()))
                }
                Err(err) => {
                    tracing::debug!(configmap = %name_or_id, error = %err, "inspect aborted");
                    return Err(err.into());
                }
            }
        }
        Ok(outcomes)
    }

    async fn list(
        &self,
        _ctx: &CallContext,
        request: &ListRequest,
    ) -> Result<Vec<InfoReport>, EngineError> {
        let filter = Filter::parse(&request.filters)?;
        let reports = self
            .manager
            .list()?
            .iter()
            .filter(|record| filter.passes(&record.name, &record.id))
            .map(InfoReport::from)
            .collect();
        Ok(reports)
    }

    async fn remove(
        &self,
        _ctx: &CallContext,
        names_or_ids: &[String],
        options: RemoveOptions,
    ) -> BatchResult<RemoveReport> {
        let targets: Vec<String> = if options.all {
            self.manager.list()?.into_iter().map(|record| record.id).collect()
        } else {
            names_or_ids.to_vec()
        };

        let mut outcomes = Vec::with_capacity(targets.len());
        for target in targets {
            match self.manager.delete(&target) {
                Ok(id) => outcomes.push(Outcome::Ok(RemoveReport { id })),
                Err(ManagerError::NotFound(_)) => outcomes.push(Outcome::NotFound(target)),
                Err(err) => {
                    tracing::debug!(configmap = %target, error = %err, "remove aborted");
                    return Err(err.into());
                }
            }
        }
        Ok(outcomes)
    }

    async fn update(
        &self,
        _ctx: &CallContext,
        _name: &str,
        _data: &[u8],
    ) -> Result<(), EngineError> {
        Err(EngineError::Unsupported("update is not supported".into()))
    }
}
