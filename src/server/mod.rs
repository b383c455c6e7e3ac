//! HTTP server exposing an `Engine` on the libpod and compat configmap routes.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! | Method | libpod | compat |
//! |---|---|---|
//! | POST | `/libpod/configmaps/create` | `/configmaps/create` |
//! | GET | `/libpod/configmaps/json` | `/configmaps` |
//! | GET | `/libpod/configmaps/:name/json` | `/configmaps/:name` |
//! | DELETE | `/libpod/configmaps/:name` | `/configmaps/:name` |
//! | POST | `/libpod/configmaps/:name/update` | `/configmaps/:name/update` |
//!
//! Compat list and inspect replies carry a constant `Version`. Every error
//! is an `ErrorModel` body with the matching status code.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use configmaps::{server, LocalEngine, Manager};
//!
//! let engine = Arc::new(LocalEngine::new(Arc::new(manager)));
//!
//! // Compose with other axum routes
//! let app = server::router(engine.clone());
//!
//! // Or serve directly
//! server::serve(engine, "127.0.0.1:8080").await?;
//! ```

mod error;
mod handlers;

use std::future::Future;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;

use crate::engine::Engine;

pub use error::ApiError;

/// Build an axum `Router` serving configmaps from `engine`.
pub fn router(engine: Arc<dyn Engine>) -> Router {
    Router::new()
        .route("/libpod/configmaps/create", post(handlers::create))
        .route("/libpod/configmaps/json", get(handlers::list))
        .route("/libpod/configmaps/:name/json", get(handlers::inspect))
        .route("/libpod/configmaps/:name", axum::routing::delete(handlers::remove))
        .route("/libpod/configmaps/:name/update", post(handlers::update))
        .route("/configmaps", get(handlers::list_compat))
        .route("/configmaps/create", post(handlers::create))
        .route(
            "/configmaps/:name",
            get(handlers::inspect_compat).delete(handlers::remove),
        )
        .route("/configmaps/:name/update", post(handlers::update))
        .with_state(engine)
}

/// Serve `engine` at the given address (e.g. `"127.0.0.1:8080"`) until the
/// process exits.
pub async fn serve(engine: Arc<dyn Engine>, addr: &str) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    serve_until(engine, listener, std::future::pending()).await
}

/// Serve on an already bound listener until `shutdown` resolves, then drain
/// in-flight requests.
pub async fn serve_until<F>(
    engine: Arc<dyn Engine>,
    listener: TcpListener,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "serving configmaps API");
    }
    axum::serve(listener, router(engine))
        .with_graceful_shutdown(shutdown)
        .await?;
    tracing::info!("configmaps API stopped");
    Ok(())
}
