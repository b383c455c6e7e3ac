//! `configmaps create` command.

use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Args;

use configmaps::{Config, CreateOptions, DriverOptions};

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Configmap name
    pub name: String,

    /// File to read, `-` for stdin, or a variable name with --env
    pub source: String,

    /// Driver storing the payload
    #[arg(long)]
    pub driver: Option<String>,

    /// Driver specific options (KEY=VALUE, comma separated)
    #[arg(long = "driver-opts", value_delimiter = ',', value_parser = parse_key_value)]
    pub driver_opts: Vec<(String, String)>,

    /// Read the data from the environment variable named by SOURCE
    #[arg(long)]
    pub env: bool,
}

pub async fn cmd_create(config: &Config, args: &CreateArgs) -> Result<ExitCode> {
    let mut reader = open_source(args)?;
    let engine = config.connect()?;

    let options = CreateOptions {
        driver: args.driver.clone().unwrap_or_default(),
        driver_options: args.driver_opts.iter().cloned().collect::<DriverOptions>(),
    };
    let report = engine
        .create(&config.call_context(), &args.name, reader.as_mut(), options)
        .await?;
    println!("{}", report.id);
    Ok(ExitCode::SUCCESS)
}

fn open_source(args: &CreateArgs) -> Result<Box<dyn Read + Send>> {
    if args.env {
        return match std::env::var(&args.source) {
            Ok(value) if !value.is_empty() => Ok(Box::new(Cursor::new(value.into_bytes()))),
            _ => bail!(
                "cannot store configmap data: environment variable {} is not set",
                args.source
            ),
        };
    }

    if args.source == "-" || args.source == "/dev/stdin" {
        if !stdin_is_pipe()? {
            bail!("if `-` is used, data must be passed into stdin");
        }
        return Ok(Box::new(io::stdin()));
    }

    let path = Path::new(&args.source);
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(Box::new(file))
}

#[cfg(unix)]
fn stdin_is_pipe() -> Result<bool> {
    use std::os::unix::fs::FileTypeExt;

    let metadata = std::fs::metadata("/dev/stdin").context("inspecting stdin")?;
    Ok(metadata.file_type().is_fifo())
}

#[cfg(not(unix))]
fn stdin_is_pipe() -> Result<bool> {
    use std::io::IsTerminal;

    Ok(!io::stdin().is_terminal())
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {raw:?}")),
    }
}
