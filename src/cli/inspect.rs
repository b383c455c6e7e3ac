//! `configmaps inspect` command.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use configmaps::{partition, Config};

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Configmap names or IDs
    #[arg(required = true)]
    pub names: Vec<String>,
}

pub async fn cmd_inspect(config: &Config, args: &InspectArgs) -> Result<ExitCode> {
    let engine = config.connect()?;
    let outcomes = engine.inspect(&config.call_context(), &args.names).await?;
    let (reports, failures) = partition(outcomes);

    // The array is printed even when every item failed.
    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(super::report_failures("inspecting", &failures))
}
