//! `configmaps ls` command.

use std::process::ExitCode;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use clap::Args;

use configmaps::{Config, InfoReport, ListRequest};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter output (KEY=VALUE, keys: name, id)
    #[arg(short, long = "filter", value_name = "KEY=VALUE")]
    pub filters: Vec<String>,

    /// Print IDs only
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the reports as JSON
    #[arg(long, conflicts_with = "quiet")]
    pub json: bool,
}

pub async fn cmd_list(config: &Config, args: &ListArgs) -> Result<ExitCode> {
    let request = list_request(&args.filters)?;
    let engine = config.connect()?;
    let reports = engine.list(&config.call_context(), &request).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else if args.quiet {
        for report in &reports {
            println!("{}", report.id);
        }
    } else {
        print!("{}", render_table(&reports, Utc::now()));
    }
    Ok(ExitCode::SUCCESS)
}

fn list_request(filters: &[String]) -> Result<ListRequest> {
    let mut request = ListRequest::new();
    for raw in filters {
        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| anyhow!("invalid filter {raw:?}: expected KEY=VALUE"))?;
        request = request.filter(key, value);
    }
    Ok(request)
}

fn render_table(reports: &[InfoReport], now: DateTime<Utc>) -> String {
    let rows: Vec<[String; 5]> = reports
        .iter()
        .map(|report| {
            [
                report.id.clone(),
                report.name().to_string(),
                report.spec.driver.name.clone(),
                humanize(now, report.created_at),
                humanize(now, report.updated_at),
            ]
        })
        .collect();

    let header = ["ID", "NAME", "DRIVER", "CREATED", "UPDATED"];
    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    let mut push_row = |cells: [&str; 5]| {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    };
    push_row(header);
    for row in &rows {
        push_row(row.each_ref().map(String::as_str));
    }
    out
}

fn humanize(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds().max(0);
    match seconds {
        0..=59 => "Less than a minute ago".to_string(),
        60..=3599 => plural(seconds / 60, "minute"),
        3600..=86_399 => plural(seconds / 3600, "hour"),
        _ => plural(seconds / 86_400, "day"),
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}
