//! Metric table building
//!
//! This module aligns the ragged per-metric series of one raw record into a
//! single timestamp-indexed table:
//! - Requested metrics absent from the record are skipped silently
//! - Present series are outer-joined on their timestamp keys
//! - Cells left empty by the join are filled with `0.0`
//! - Calendar/activity features are derived per row

use crate::features;
use crate::record::RawRecord;
use crate::types::{MetricRow, MetricTable, ACT_TYPE_METRIC};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

/// Builder for the per-file aligned metric table
pub struct TableBuilder;

impl TableBuilder {
    /// Build an aligned table from a raw record and an ordered list of
    /// requested metric keys.
    ///
    /// The table's columns are the requested metrics that the record
    /// actually carries, in request order. Rows are the full union of
    /// timestamps across those series, sorted ascending; a metric with no
    /// sample at some timestamp gets a `0.0` cell there. An empty request,
    /// or a record carrying none of the requested metrics, yields an empty
    /// table.
    pub fn build(record: &RawRecord, requested: &[&str]) -> MetricTable {
        let mut columns: Vec<String> = Vec::new();
        // Join on the raw timestamp key: metric -> value cells per timestamp
        let mut cells: BTreeMap<&str, BTreeMap<String, f64>> = BTreeMap::new();

        for &metric in requested {
            let Some(series) = record.metric_series(metric) else {
                // Best-effort: a metric the device never recorded is not an
                // error, it just never becomes a column
                continue;
            };
            columns.push(metric.to_string());
            for (ts_key, &value) in series {
                cells
                    .entry(ts_key.as_str())
                    .or_default()
                    .insert(metric.to_string(), value);
            }
        }

        let has_act_type = columns.iter().any(|c| c == ACT_TYPE_METRIC);
        let mut rows: Vec<MetricRow> = Vec::with_capacity(cells.len());

        for (ts_key, mut values) in cells {
            let Ok(timestamp) = ts_key.parse::<f64>() else {
                debug!(key = ts_key, "dropping sample with non-numeric timestamp");
                continue;
            };
            // Zero fill: every column gets a cell in every row
            for col in &columns {
                values.entry(col.clone()).or_insert(0.0);
            }
            match features::derive_row(timestamp, values, has_act_type) {
                Some(row) => rows.push(row),
                None => debug!(timestamp, "dropping sample with out-of-range timestamp"),
            }
        }

        rows.sort_by(|a, b| {
            a.timestamp
                .partial_cmp(&b.timestamp)
                .unwrap_or(Ordering::Equal)
        });

        MetricTable { columns, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActivityCategory, ALL_METRICS};

    fn record_from(json: &str) -> RawRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_only_present_metrics_become_columns() {
        let record = record_from(
            r#"{"data": [{
                "bpm": [{"1700000000": 72.0}],
                "gsr": [{"1700000000": 1.5}]
            }]}"#,
        );

        let table = TableBuilder::build(&record, &["bpm", "temperature", "gsr", "spo2"]);

        assert_eq!(table.columns, vec!["bpm", "gsr"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_outer_join_fills_gaps_with_zero() {
        let record = record_from(
            r#"{"data": [{
                "bpm": [{"1700000000": 72.0, "1700000060": 75.0}],
                "steps": [{"1700000060": 4, "1700000120": 9}]
            }]}"#,
        );

        let table = TableBuilder::build(&record, &["bpm", "steps"]);

        // Union of timestamps across both series
        assert_eq!(table.len(), 3);
        let timestamps: Vec<f64> = table.rows.iter().map(|r| r.timestamp).collect();
        assert_eq!(timestamps, vec![1700000000.0, 1700000060.0, 1700000120.0]);

        // Non-owning metric cells are zero-filled
        assert_eq!(table.rows[0].values["bpm"], 72.0);
        assert_eq!(table.rows[0].values["steps"], 0.0);
        assert_eq!(table.rows[1].values["bpm"], 75.0);
        assert_eq!(table.rows[1].values["steps"], 4.0);
        assert_eq!(table.rows[2].values["bpm"], 0.0);
        assert_eq!(table.rows[2].values["steps"], 9.0);
    }

    #[test]
    fn test_act_category_derived_when_act_type_present() {
        let record = record_from(
            r#"{"data": [{
                "act_type": [{"1700000000": 1.0, "1700000060": 7.0}],
                "steps": [{"1700000000": 3}]
            }]}"#,
        );

        let table = TableBuilder::build(&record, ALL_METRICS);

        assert_eq!(
            table.rows[0].act_category,
            Some(ActivityCategory::Walking)
        );
        assert_eq!(
            table.rows[1].act_category,
            Some(ActivityCategory::Offwrist)
        );
    }

    #[test]
    fn test_no_act_category_without_act_type_column() {
        let record = record_from(r#"{"data": [{"bpm": [{"1700000000": 72.0}]}]}"#);
        let table = TableBuilder::build(&record, ALL_METRICS);
        assert_eq!(table.rows[0].act_category, None);
    }

    #[test]
    fn test_empty_request_yields_empty_table() {
        let record = record_from(r#"{"data": [{"bpm": [{"1700000000": 72.0}]}]}"#);
        let table = TableBuilder::build(&record, &[]);
        assert!(table.is_empty());
        assert!(table.columns.is_empty());
    }

    #[test]
    fn test_record_without_requested_metrics_yields_empty_table() {
        let record = record_from(r#"{"data": [{"emotion": [{"1700000000": 2.0}]}]}"#);
        let table = TableBuilder::build(&record, &["bpm", "gsr"]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_non_numeric_timestamp_key_is_dropped() {
        let record = record_from(
            r#"{"data": [{"bpm": [{"1700000000": 72.0, "garbage": 75.0}]}]}"#,
        );
        let table = TableBuilder::build(&record, &["bpm"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].timestamp, 1700000000.0);
    }

    #[test]
    fn test_derived_calendar_columns() {
        // 1700000000 = 2023-11-14 22:13:20 UTC
        let record = record_from(r#"{"data": [{"bpm": [{"1700000000": 72.0}]}]}"#);
        let table = TableBuilder::build(&record, &["bpm"]);

        let row = &table.rows[0];
        assert_eq!(row.date.to_string(), "2023-11-14");
        assert_eq!(row.weekday, "Tuesday");
        assert_eq!(row.hour, 22);
    }
}
