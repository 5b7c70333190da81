//! Range filtering and summary aggregation
//!
//! The dashboard narrows the combined table to a user-selected time window
//! and metric subset before charting, and summarizes each metric over the
//! filtered rows for the metric cards.

use crate::error::TelemetryError;
use crate::types::{metric_info, MetricTable, STEPS_METRIC};
use chrono::{DateTime, Utc};

/// How a metric is rolled up over the filtered rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// Cumulative counters (step count)
    Sum,
    /// Sampled measurements (everything else)
    Mean,
}

/// Aggregation used for a metric's summary card
pub fn aggregation_for(metric: &str) -> Aggregation {
    if metric == STEPS_METRIC {
        Aggregation::Sum
    } else {
        Aggregation::Mean
    }
}

/// One summary card: a metric rolled up over the filtered rows
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSummary {
    pub metric: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub value: f64,
}

/// Metrics shown as summary cards, in display order
pub const SUMMARY_METRICS: &[&str] = &[
    "steps",
    "gsr",
    "temperature",
    "bpm",
    "hr_quality",
    "activity",
    "spo2",
    "battery",
];

/// Narrow a combined table to the open interval `(start, end)` and the
/// requested metric columns.
///
/// Rows with `date_time` exactly equal to `start` or `end` are excluded;
/// the interval is open on both ends. Requesting a window that starts
/// before the table's earliest sample or ends after its latest fails with
/// `RangeOutOfBounds` so the caller can tell the user the recorded span —
/// the window is never clamped silently. An empty input table filters to
/// an empty table without validation.
pub fn filter_range(
    table: &MetricTable,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    metrics: &[&str],
) -> Result<MetricTable, TelemetryError> {
    let Some((data_start, data_end)) = table.span() else {
        return Ok(MetricTable::default());
    };

    if start < data_start || end > data_end {
        return Err(TelemetryError::RangeOutOfBounds {
            start,
            end,
            data_start,
            data_end,
        });
    }

    let windowed = MetricTable {
        columns: table.columns.clone(),
        rows: table
            .rows
            .iter()
            .filter(|row| row.date_time > start && row.date_time < end)
            .cloned()
            .collect(),
    };

    Ok(project(&windowed, metrics))
}

/// Keep only the requested metric columns; the derived calendar and
/// activity fields always survive projection
pub fn project(table: &MetricTable, metrics: &[&str]) -> MetricTable {
    let columns: Vec<String> = table
        .columns
        .iter()
        .filter(|col| metrics.contains(&col.as_str()))
        .cloned()
        .collect();

    let rows = table
        .rows
        .iter()
        .map(|row| {
            let mut row = row.clone();
            row.values.retain(|key, _| columns.iter().any(|c| c == key));
            row
        })
        .collect();

    MetricTable { columns, rows }
}

/// Roll up one metric over a table's rows.
///
/// Only rows carrying the column contribute, mirroring how the combined
/// table leaves cells absent for files that never recorded the metric. A
/// metric absent as a column yields `0.0`, never an error.
pub fn summarize(table: &MetricTable, metric: &str) -> f64 {
    if !table.has_metric(metric) {
        return 0.0;
    }

    let values: Vec<f64> = table
        .rows
        .iter()
        .filter_map(|row| row.values.get(metric).copied())
        .collect();

    match aggregation_for(metric) {
        Aggregation::Sum => values.iter().sum(),
        Aggregation::Mean => {
            if values.is_empty() {
                0.0
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            }
        }
    }
}

/// Build the dashboard's summary cards over a filtered table.
///
/// Sampled metrics are rounded to two decimal places for display; the step
/// total is left exact.
pub fn summary_panel(table: &MetricTable) -> Vec<MetricSummary> {
    SUMMARY_METRICS
        .iter()
        .filter_map(|&metric| {
            let info = metric_info(metric)?;
            let raw = summarize(table, metric);
            let value = match aggregation_for(metric) {
                Aggregation::Sum => raw,
                Aggregation::Mean => (raw * 100.0).round() / 100.0,
            };
            Some(MetricSummary {
                metric: info.key,
                label: info.label,
                unit: info.unit,
                value,
            })
        })
        .collect()
}
