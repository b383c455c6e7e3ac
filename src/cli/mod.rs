//! `configmaps` command line.
//!
//! Every command except `serve` runs against the engine chosen by
//! configuration: remote when a server URL is set, local otherwise.

mod create;
mod inspect;
mod list;
mod rm;
mod serve;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use configmaps::{Config, EngineError};

#[derive(Parser, Debug)]
#[command(name = "configmaps", version, about = "Manage configmaps")]
pub struct Cli {
    #[command(flatten)]
    opts: GlobalOpts,

    #[command(subcommand)]
    command: Command,
}

/// Global options. Each overrides the matching `CONFIGMAPS_*` variable.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Storage root directory (env: CONFIGMAPS_ROOT)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Server URL; commands run remotely when set (env: CONFIGMAPS_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Deadline for each remote call in milliseconds (env: CONFIGMAPS_TIMEOUT_MS)
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new configmap
    Create(create::CreateArgs),

    /// Display detail information on one or more configmaps
    Inspect(inspect::InspectArgs),

    /// List configmaps
    #[command(alias = "list")]
    Ls(list::ListArgs),

    /// Remove one or more configmaps
    Rm(rm::RmArgs),

    /// Serve the configmaps HTTP API
    Serve(serve::ServeArgs),
}

impl Cli {
    pub fn default_log_level(&self) -> &'static str {
        match self.command {
            Command::Serve(_) => "info",
            _ => "warn",
        }
    }

    pub async fn run(self) -> Result<ExitCode> {
        let config = self.opts.resolve()?;
        match self.command {
            Command::Create(args) => create::cmd_create(&config, &args).await,
            Command::Inspect(args) => inspect::cmd_inspect(&config, &args).await,
            Command::Ls(args) => list::cmd_list(&config, &args).await,
            Command::Rm(args) => rm::cmd_rm(&config, &args).await,
            Command::Serve(args) => serve::cmd_serve(&config, &args).await,
        }
    }
}

impl GlobalOpts {
    /// Environment configuration with command line overrides applied.
    pub fn resolve(&self) -> Result<Config> {
        let mut config = Config::from_env().context("reading configuration")?;
        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(url) = &self.url {
            config.url = Some(url.clone()).filter(|url| !url.is_empty());
        }
        if let Some(millis) = self.timeout_ms {
            config.timeout = Some(Duration::from_millis(millis));
        }
        Ok(config)
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides `default_level`.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Print per-item failures to stderr and pick the exit code.
fn report_failures(verb: &str, failures: &[EngineError]) -> ExitCode {
    for err in failures {
        eprintln!("Error {verb} configmap: {err}");
    }
    if failures.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
