//! `configmaps rm` command.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use configmaps::{partition, Config, RemoveOptions};

#[derive(Args, Debug)]
pub struct RmArgs {
    /// Configmap names or IDs
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    pub names: Vec<String>,

    /// Remove all configmaps
    #[arg(short, long)]
    pub all: bool,
}

pub async fn cmd_rm(config: &Config, args: &RmArgs) -> Result<ExitCode> {
    let engine = config.connect()?;
    let outcomes = engine
        .remove(
            &config.call_context(),
            &args.names,
            RemoveOptions { all: args.all },
        )
        .await?;
    let (removed, failures) = partition(outcomes);
    for report in removed {
        println!("{}", report.id);
    }
    Ok(super::report_failures("removing", &failures))
}
