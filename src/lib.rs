//! Kiddo Metrics - Telemetry reshaping core for the Kiddo wearable health dashboard
//!
//! Kiddo Metrics turns per-child wearable session files into the aligned,
//! filterable table the dashboard charts from, through a deterministic
//! pipeline: record loading → metric table building (with feature
//! derivation) → multi-file combination → range/metric filtering.
//!
//! ## Modules
//!
//! - **record**: Load raw per-session JSON documents from disk
//! - **table**: Outer-join ragged per-metric series into one aligned table
//! - **features**: Derive calendar and activity features per row
//! - **combine**: Discover and concatenate all session files for one child
//! - **filter**: Narrow by time window and metric subset, summarize metrics

pub mod combine;
pub mod error;
pub mod features;
pub mod filter;
pub mod record;
pub mod table;
pub mod types;

pub use combine::combine;
pub use error::TelemetryError;
pub use filter::{filter_range, project, summarize, summary_panel, Aggregation, MetricSummary};
pub use record::{load, RawRecord};
pub use table::TableBuilder;
pub use types::{
    ActivityCategory, MetricGroup, MetricRow, MetricTable, TimeRange, ALL_METRICS,
};

/// Crate version embedded in CLI output
pub const KIDDO_VERSION: &str = env!("CARGO_PKG_VERSION");
