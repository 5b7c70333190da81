//! Error types for Kiddo Metrics

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, combining, or filtering telemetry
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "selected range {start} to {end} is outside the recorded span {data_start} to {data_end}"
    )]
    RangeOutOfBounds {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        data_start: DateTime<Utc>,
        data_end: DateTime<Utc>,
    },
}
