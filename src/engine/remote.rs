//! RemoteEngine - engine operations over the configmaps HTTP API.
//!
//! Every server round trip is attempted exactly once. A call either decodes
//! the server's reply, fails with the application error the server reported,
//! or fails with a `TransportError` when the exchange itself did not finish
//! (connection refused, cancelled, deadline passed). Cancellation drops the
//! in-flight request, which closes its connection.

use std::io::Read;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::{BatchResult, CallContext, Engine, EngineError, Outcome, TransportError};
use crate::entities::{
    CreateOptions, CreateReport, CreateRequest, DriverSpec, InfoReport, ListRequest,
    RemoveOptions, RemoveReport,
};

/// A decoded HTTP exchange.
struct Reply {
    status: StatusCode,
    body: Vec<u8>,
}

impl Reply {
    fn json<T: DeserializeOwned>(&self) -> Result<T, EngineError> {
        serde_json::from_slice(&self.body).map_err(|e| EngineError::Decode(e.to_string()))
    }

    fn error(&self, subject: &str) -> EngineError {
        EngineError::from_response(self.status.as_u16(), &self.body, subject)
    }
}

/// Talks to a server exposing the libpod configmaps routes.
///
/// ## Example
///
/// ```ignore
/// let engine = RemoteEngine::new("http://127.0.0.1:8080")?;
/// let ctx = CallContext::with_timeout(Duration::from_secs(10));
/// let reports = engine.list(&ctx, &ListRequest::new().filter("name", "^app")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct RemoteEngine {
    client: Client,
    base_url: Url,
}

impl RemoteEngine {
    pub fn new(base_url: &str) -> Result<Self, EngineError> {
        let client = Client::builder()
            .build()
            .map_err(|e| EngineError::Transport(TransportError::Other(e.to_string())))?;
        Self::with_client(client, base_url)
    }

    /// Use a preconfigured client (proxies, TLS, default timeouts).
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, EngineError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| EngineError::InvalidInput(format!("invalid server URL {:?}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(EngineError::InvalidInput(format!(
                "invalid server URL {:?}",
                base_url.as_str()
            )));
        }
        Ok(RemoteEngine { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send one request and read the whole reply, unless `ctx` fires first.
    async fn execute(
        &self,
        ctx: &CallContext,
        method: Method,
        url: Url,
        build: impl FnOnce(reqwest::RequestBuilder) -> reqwest::RequestBuilder,
    ) -> Result<Reply, EngineError> {
        ctx.check()?;
        let mut request = build(self.client.request(method.clone(), url.clone()));
        if let Some(remaining) = ctx.remaining() {
            request = request.timeout(remaining);
        }

        tracing::debug!(%method, %url, "sending configmaps request");
        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(Reply {
                status,
                body: body.to_vec(),
            })
        };

        tokio::select! {
            biased;
            reason = ctx.done() => {
                tracing::debug!(%method, %url, %reason, "configmaps request aborted");
                Err(EngineError::Transport(reason))
            }
            result = exchange => {
                let reply = result.map_err(TransportError::from)?;
                tracing::debug!(%method, %url, status = %reply.status, "configmaps response");
                Ok(reply)
            }
        }
    }

    async fn inspect_one(
        &self,
        ctx: &CallContext,
        name_or_id: &str,
    ) -> Result<Option<InfoReport>, EngineError> {
        if is_dot_segment(name_or_id) {
            return Ok(None);
        }
        let url = self.endpoint(&["libpod", "configmaps", name_or_id, "json"]);
        let reply = self.execute(ctx, Method::GET, url, |r| r).await?;
        match reply.status {
            status if status.is_success() => reply.json().map(Some),
            StatusCode::NOT_FOUND => Ok(None),
            _ => Err(reply.error(name_or_id)),
        }
    }

    /// `Ok(false)` when the server no longer has the configmap.
    async fn delete_one(&self, ctx: &CallContext, name_or_id: &str) -> Result<bool, EngineError> {
        if is_dot_segment(name_or_id) {
            return Ok(false);
        }
        let url = self.endpoint(&["libpod", "configmaps", name_or_id]);
        let reply = self.execute(ctx, Method::DELETE, url, |r| r).await?;
        match reply.status {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(reply.error(name_or_id)),
        }
    }
}

/// `.` and `..` are collapsed by URL normalization and would address a
/// different route. Neither is a valid name or ID.
fn is_dot_segment(name_or_id: &str) -> bool {
    matches!(name_or_id, "." | "..")
}

#[async_trait]
impl Engine for RemoteEngine {
    async fn create(
        &self,
        ctx: &CallContext,
        name: &str,
        data: &mut (dyn Read + Send),
        options: CreateOptions,
    ) -> Result<CreateReport, EngineError> {
        let mut payload = Vec::new();
        data.read_to_end(&mut payload)
            .map_err(|e| EngineError::InvalidInput(format!("reading configmap data: {}", e)))?;

        let body = CreateRequest {
            name: name.to_string(),
            data: STANDARD.encode(&payload),
            driver: DriverSpec {
                name: options.driver,
                options: options.driver_options,
            },
            labels: Default::default(),
        };
        let url = self.endpoint(&["libpod", "configmaps", "create"]);
        let reply = self
            .execute(ctx, Method::POST, url, |r| r.json(&body))
            .await?;
        if reply.status.is_success() {
            reply.json()
        } else {
            Err(reply.error(name))
        }
    }

    async fn inspect(&self, ctx: &CallContext, names_or_ids: &[String]) -> BatchResult<InfoReport> {
        let mut outcomes = Vec::with_capacity(names_or_ids.len());
        for name_or_id in names_or_ids {
            match self.inspect_one(ctx, name_or_id).await? {
                Some(report) => outcomes.push(Outcome::Ok(report)),
                None => outcomes.push(Outcome::NotFound(name_or_id.clone())),
            }
        }
        Ok(outcomes)
    }

    async fn list(
        &self,
        ctx: &CallContext,
        request: &ListRequest,
    ) -> Result<Vec<InfoReport>, EngineError> {
        let url = self.endpoint(&["libpod", "configmaps", "json"]);
        let filters = if request.filters.is_empty() {
            None
        } else {
            Some(
                serde_json::to_string(&request.filters)
                    .map_err(|e| EngineError::InvalidFilter(e.to_string()))?,
            )
        };
        let reply = self
            .execute(ctx, Method::GET, url, |r| match &filters {
                Some(filters) => r.query(&[("filters", filters)]),
                None => r,
            })
            .await?;
        if reply.status.is_success() {
            reply.json()
        } else {
            Err(reply.error(""))
        }
    }

    async fn remove(
        &self,
        ctx: &CallContext,
        names_or_ids: &[String],
        options: RemoveOptions,
    ) -> BatchResult<RemoveReport> {
        let mut outcomes = Vec::new();

        if options.all {
            let snapshot = self.list(ctx, &ListRequest::default()).await?;
            for report in snapshot {
                if self.delete_one(ctx, &report.id).await? {
                    outcomes.push(Outcome::Ok(RemoveReport { id: report.id }));
                } else {
                    outcomes.push(Outcome::NotFound(report.id));
                }
            }
            return Ok(outcomes);
        }

        // The delete route answers 204 with no body, so resolve the ID first.
        for name_or_id in names_or_ids {
            let Some(report) = self.inspect_one(ctx, name_or_id).await? else {
                outcomes.push(Outcome::NotFound(name_or_id.clone()));
                continue;
            };
            if self.delete_one(ctx, &report.id).await? {
                outcomes.push(Outcome::Ok(RemoveReport { id: report.id }));
            } else {
                outcomes.push(Outcome::NotFound(name_or_id.clone()));
            }
        }
        Ok(outcomes)
    }

    async fn update(&self, ctx: &CallContext, name: &str, data: &[u8]) -> Result<(), EngineError> {
        if is_dot_segment(name) {
            return Err(EngineError::Unsupported("update is not supported".into()));
        }
        let url = self.endpoint(&["libpod", "configmaps", name, "update"]);
        let body = data.to_vec();
        let reply = self
            .execute(ctx, Method::POST, url, |r| r.body(body))
            .await?;
        if reply.status.is_success() {
            Ok(())
        } else {
            Err(reply.error(name))
        }
    }
}
