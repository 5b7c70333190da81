//! Kiddo CLI - Command-line interface for Kiddo Metrics
//!
//! Commands:
//! - span: Report the recorded time span for a child
//! - summary: Print the summary-panel aggregates for a time window
//! - export: Dump the filtered table as JSON

use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, NaiveDateTime, Utc};
use kiddo_metrics::error::TelemetryError;
use kiddo_metrics::types::{MetricGroup, MetricTable};
use kiddo_metrics::{combine, filter_range, project, summary_panel, KIDDO_VERSION};

/// Kiddo - Telemetry reshaping core for the Kiddo wearable health dashboard
#[derive(Parser)]
#[command(name = "kiddo")]
#[command(version = KIDDO_VERSION)]
#[command(about = "Reshape and summarize per-child wearable telemetry", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the recorded time span for a child
    Span {
        /// Child identifier (matched as a filename substring)
        #[arg(short, long)]
        child_id: String,

        /// Directory of session JSON files
        #[arg(short, long)]
        directory: PathBuf,
    },

    /// Print the summary-panel aggregates for a time window
    Summary {
        /// Child identifier (matched as a filename substring)
        #[arg(short, long)]
        child_id: String,

        /// Directory of session JSON files
        #[arg(short, long)]
        directory: PathBuf,

        /// Window start, "YYYY-MM-DD HH:MM:SS" (defaults to the full span)
        #[arg(long)]
        start: Option<String>,

        /// Window end, "YYYY-MM-DD HH:MM:SS" (defaults to the full span)
        #[arg(long)]
        end: Option<String>,
    },

    /// Dump the filtered table as JSON
    Export {
        /// Child identifier (matched as a filename substring)
        #[arg(short, long)]
        child_id: String,

        /// Directory of session JSON files
        #[arg(short, long)]
        directory: PathBuf,

        /// Window start, "YYYY-MM-DD HH:MM:SS" (defaults to the full span)
        #[arg(long)]
        start: Option<String>,

        /// Window end, "YYYY-MM-DD HH:MM:SS" (defaults to the full span)
        #[arg(long)]
        end: Option<String>,

        /// Metric groups to keep (type11, type12, type74, type_derived);
        /// defaults to all groups
        #[arg(long = "group")]
        groups: Vec<String>,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error("invalid date-time {0:?}: expected \"YYYY-MM-DD HH:MM:SS\"")]
    BadDateTime(String),

    #[error("unknown metric group {0:?}: expected type11, type12, type74 or type_derived")]
    BadGroup(String),

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),

    #[error("failed to encode table: {0}")]
    Encode(#[from] serde_json::Error),
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Span {
            child_id,
            directory,
        } => {
            let table = combine(&child_id, &directory)?;
            match table.span() {
                Some((start, end)) => {
                    println!("Child Id: {child_id}");
                    println!("Data recorded from {start} to {end} ({} samples)", table.len());
                }
                None => println!("Data is not recorded"),
            }
            Ok(())
        }

        Commands::Summary {
            child_id,
            directory,
            start,
            end,
        } => {
            let table = combine(&child_id, &directory)?;
            if table.is_empty() {
                println!("Data is not recorded");
                return Ok(());
            }

            let windowed = apply_window(&table, start.as_deref(), end.as_deref())?;
            println!("Child Id: {child_id}");
            for card in summary_panel(&windowed) {
                let note = if table.has_metric(card.metric) {
                    ""
                } else {
                    " (not recorded for this device)"
                };
                println!("{:<24} {:>12.2} {}{note}", card.label, card.value, card.unit);
            }
            Ok(())
        }

        Commands::Export {
            child_id,
            directory,
            start,
            end,
            groups,
            output,
        } => {
            let table = combine(&child_id, &directory)?;
            let windowed = apply_window(&table, start.as_deref(), end.as_deref())?;
            let projected = project_groups(&windowed, &groups)?;

            let json = serde_json::to_string_pretty(&projected)?;
            if output.as_os_str() == "-" {
                io::stdout().write_all(json.as_bytes())?;
                io::stdout().write_all(b"\n")?;
            } else {
                fs::write(&output, json)?;
            }
            Ok(())
        }
    }
}

/// Filter to the given window when one is selected; otherwise pass the
/// table through untouched (the open interval would drop boundary rows)
fn apply_window(
    table: &MetricTable,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<MetricTable, CliError> {
    let (Some(start), Some(end)) = (start, end) else {
        return Ok(table.clone());
    };
    let start = parse_date_time(start)?;
    let end = parse_date_time(end)?;

    let metrics: Vec<&str> = table.columns.iter().map(String::as_str).collect();
    Ok(filter_range(table, start, end, &metrics)?)
}

fn project_groups(table: &MetricTable, groups: &[String]) -> Result<MetricTable, CliError> {
    if groups.is_empty() {
        return Ok(table.clone());
    }

    let mut metrics: Vec<&str> = Vec::new();
    for name in groups {
        let group =
            MetricGroup::from_name(name).ok_or_else(|| CliError::BadGroup(name.clone()))?;
        for &metric in group.metrics() {
            if !metrics.contains(&metric) {
                metrics.push(metric);
            }
        }
    }

    Ok(project(table, &metrics))
}

fn parse_date_time(text: &str) -> Result<DateTime<Utc>, CliError> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
        .map(|naive| naive.and_utc())
        .map_err(|_| CliError::BadDateTime(text.to_string()))
}
