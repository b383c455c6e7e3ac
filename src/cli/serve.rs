//! `configmaps serve` command.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tokio::net::TcpListener;

use configmaps::{server, Config};

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen address (env: CONFIGMAPS_BIND)
    #[arg(long)]
    pub bind: Option<String>,
}

pub async fn cmd_serve(config: &Config, args: &ServeArgs) -> Result<ExitCode> {
    let bind = args.bind.as_deref().unwrap_or(&config.bind);
    let engine = Arc::new(config.local_engine()?);
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("binding {bind}"))?;

    server::serve_until(engine, listener, shutdown_signal()).await?;
    Ok(ExitCode::SUCCESS)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
