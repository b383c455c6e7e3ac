use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;

use super::error::ApiError;
use crate::compat::{to_compat, InfoReportCompat};
use crate::engine::{CallContext, Engine, EngineError, Outcome};
use crate::entities::{CreateOptions, CreateRequest, InfoReport, ListRequest, RemoveOptions};

pub(super) type SharedEngine = Arc<dyn Engine>;

#[derive(Debug, Default, Deserialize)]
pub(super) struct ListParams {
    filters: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RemoveParams {
    all: Option<bool>,
}

/// `POST /libpod/configmaps/create` and `POST /configmaps/create`.
pub(super) async fn create(
    State(engine): State<SharedEngine>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: CreateRequest = serde_json::from_slice(&body)
        .map_err(|e| EngineError::InvalidInput(format!("decoding request body: {}", e)))?;
    if !request.labels.is_empty() {
        return Err(EngineError::InvalidInput("labels not supported".into()).into());
    }
    let payload = STANDARD
        .decode(request.data.as_bytes())
        .map_err(|e| EngineError::InvalidInput(format!("decoding configmap data: {}", e)))?;

    let options = CreateOptions {
        driver: request.driver.name,
        driver_options: request.driver.options,
    };
    let report = engine
        .create(
            &CallContext::background(),
            &request.name,
            &mut Cursor::new(payload),
            options,
        )
        .await?;
    tracing::info!(name = %request.name, id = %report.id, "created configmap");
    Ok((StatusCode::OK, Json(report)).into_response())
}

async fn list_reports(
    engine: &SharedEngine,
    params: ListParams,
) -> Result<Vec<InfoReport>, ApiError> {
    let filters = match params.filters.as_deref() {
        None | Some("") => HashMap::new(),
        Some(raw) => serde_json::from_str::<HashMap<String, Vec<String>>>(raw)
            .map_err(|e| EngineError::InvalidFilter(format!("invalid filters parameter: {}", e)))?,
    };
    let reports = engine
        .list(&CallContext::background(), &ListRequest { filters })
        .await?;
    Ok(reports)
}

/// `GET /libpod/configmaps/json`.
pub(super) async fn list(
    State(engine): State<SharedEngine>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<InfoReport>>, ApiError> {
    list_reports(&engine, params).await.map(Json)
}

/// `GET /configmaps`.
pub(super) async fn list_compat(
    State(engine): State<SharedEngine>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<InfoReportCompat>>, ApiError> {
    let reports = list_reports(&engine, params).await?;
    Ok(Json(to_compat(reports)))
}

async fn inspect_one(engine: &SharedEngine, name: String) -> Result<InfoReport, ApiError> {
    let outcomes = engine
        .inspect(&CallContext::background(), std::slice::from_ref(&name))
        .await?;
    match outcomes.into_iter().next() {
        Some(outcome) => Ok(outcome.into_result()?),
        None => Err(EngineError::NotFound(name).into()),
    }
}

/// `GET /libpod/configmaps/:name/json`.
pub(super) async fn inspect(
    State(engine): State<SharedEngine>,
    Path(name): Path<String>,
) -> Result<Json<InfoReport>, ApiError> {
    inspect_one(&engine, name).await.map(Json)
}

/// `GET /configmaps/:name`.
pub(super) async fn inspect_compat(
    State(engine): State<SharedEngine>,
    Path(name): Path<String>,
) -> Result<Json<InfoReportCompat>, ApiError> {
    let report = inspect_one(&engine, name).await?;
    Ok(Json(InfoReportCompat::from(report)))
}

/// `DELETE /libpod/configmaps/:name` and `DELETE /configmaps/:name`.
///
/// With `all=true` every configmap is removed and the path name is ignored.
pub(super) async fn remove(
    State(engine): State<SharedEngine>,
    Path(name): Path<String>,
    Query(params): Query<RemoveParams>,
) -> Result<StatusCode, ApiError> {
    let all = params.all.unwrap_or(false);
    let names = if all { Vec::new() } else { vec![name] };
    let outcomes = engine
        .remove(&CallContext::background(), &names, RemoveOptions { all })
        .await?;

    for outcome in outcomes {
        match outcome {
            Outcome::Ok(report) => tracing::info!(id = %report.id, "removed configmap"),
            Outcome::NotFound(name) if !all => {
                return Err(EngineError::NotFound(name).into());
            }
            Outcome::NotFound(_) => {}
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /libpod/configmaps/:name/update` and `POST /configmaps/:name/update`.
pub(super) async fn update(Path(name): Path<String>) -> ApiError {
    tracing::debug!(%name, "rejecting configmap update");
    ApiError(EngineError::Unsupported("update is not supported".into()))
}
