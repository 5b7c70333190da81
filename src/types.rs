//! Core types for the Kiddo Metrics pipeline
//!
//! This module defines the metric catalog, the firmware metric groups, and
//! the aligned table types that flow through each stage of the pipeline:
//! raw record → per-file metric table → combined table → filtered view.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metric key for the device's activity-state channel
pub const ACT_TYPE_METRIC: &str = "act_type";

/// Metric key for the cumulative step counter
pub const STEPS_METRIC: &str = "steps";

/// Display metadata for one telemetry channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricInfo {
    /// Column key as it appears in the raw JSON records
    pub key: &'static str,
    /// Human-readable label shown by the dashboard
    pub label: &'static str,
    /// Display unit (empty when the metric is unitless)
    pub unit: &'static str,
}

/// Full metric catalog, in the order the dashboard requests them
pub const METRIC_CATALOG: &[MetricInfo] = &[
    MetricInfo { key: "hr_quality", label: "Heart Rate Quality", unit: "BPM" },
    MetricInfo { key: "temperature", label: "Temperature", unit: "°C" },
    MetricInfo { key: "activity", label: "Activity", unit: "activity" },
    MetricInfo { key: "gsr", label: "Galvanic Skin Response", unit: "mS" },
    MetricInfo { key: "steps", label: "Steps", unit: "steps" },
    MetricInfo { key: "battery", label: "Battery", unit: "%" },
    MetricInfo { key: "spo2", label: "Spo2", unit: "%" },
    MetricInfo { key: "bpm", label: "Heart Rate", unit: "BPM" },
    MetricInfo { key: "hr_count", label: "Heart Rate Count", unit: "" },
    MetricInfo { key: "adjusted_gsr", label: "Adjusted GSR", unit: "mS" },
    MetricInfo { key: "act_type", label: "Act Type", unit: "" },
    MetricInfo { key: "sleep", label: "Sleep", unit: "" },
    MetricInfo { key: "emotion", label: "Emotion", unit: "" },
];

/// Every known metric key, in catalog order
pub const ALL_METRICS: &[&str] = &[
    "hr_quality",
    "temperature",
    "activity",
    "gsr",
    "steps",
    "battery",
    "spo2",
    "bpm",
    "hr_count",
    "adjusted_gsr",
    "act_type",
    "sleep",
    "emotion",
];

/// Look up the display metadata for a metric key
pub fn metric_info(key: &str) -> Option<&'static MetricInfo> {
    METRIC_CATALOG.iter().find(|info| info.key == key)
}

/// Firmware payload groups: each device firmware records a fixed subset of
/// the catalog. The dashboard lets the user select one or more groups, and
/// the union of their metrics drives the chart pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricGroup {
    Type11,
    Type12,
    Type74,
    Derived,
}

impl MetricGroup {
    /// All groups, in selection order
    pub const ALL: [MetricGroup; 4] = [
        MetricGroup::Type11,
        MetricGroup::Type12,
        MetricGroup::Type74,
        MetricGroup::Derived,
    ];

    /// Metric keys recorded by this group
    pub fn metrics(&self) -> &'static [&'static str] {
        match self {
            MetricGroup::Type11 => &[
                "hr_quality",
                "temperature",
                "activity",
                "gsr",
                "steps",
                "battery",
                "bpm",
                "hr_count",
                "adjusted_gsr",
                "act_type",
            ],
            MetricGroup::Type12 => &["steps", "activity", "act_type", "battery"],
            MetricGroup::Type74 => &["hr_count", "adjusted_gsr", "spo2"],
            MetricGroup::Derived => &["sleep", "emotion"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricGroup::Type11 => "type11",
            MetricGroup::Type12 => "type12",
            MetricGroup::Type74 => "type74",
            MetricGroup::Derived => "type_derived",
        }
    }

    /// Parse a group name as entered by the user
    pub fn from_name(name: &str) -> Option<MetricGroup> {
        MetricGroup::ALL.iter().copied().find(|g| g.as_str() == name)
    }
}

/// Time-of-day bucket derived from the hour of a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Morning => "Morning",
            TimeRange::Afternoon => "Afternoon",
            TimeRange::Evening => "Evening",
            TimeRange::Night => "Night",
        }
    }
}

/// Human-readable activity state decoded from the `act_type` channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityCategory {
    Idle,
    Walking,
    Running,
    Unknown,
    Offwrist,
}

impl ActivityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityCategory::Idle => "Idle",
            ActivityCategory::Walking => "Walking",
            ActivityCategory::Running => "Running",
            ActivityCategory::Unknown => "Unknown",
            ActivityCategory::Offwrist => "Offwrist",
        }
    }
}

/// One aligned sample: the join key, the metric cells, and the calendar
/// features derived from the timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricRow {
    /// Epoch seconds; unique join key within one source file
    pub timestamp: f64,
    /// One cell per column present in the row's source file. Gap-filled
    /// cells hold `0.0`; a metric the file never recorded has no entry.
    pub values: BTreeMap<String, f64>,
    /// Timestamp decoded to UTC civil time
    pub date_time: DateTime<Utc>,
    pub date: NaiveDate,
    /// Full weekday name ("Monday" .. "Sunday")
    pub weekday: String,
    /// Hour of day, 0-23
    pub hour: u32,
    pub time_range: TimeRange,
    /// Present only when the source file recorded `act_type`
    pub act_category: Option<ActivityCategory>,
}

/// An aligned, timestamp-indexed table of metric samples.
///
/// Built per file by the table builder, then concatenated across files by
/// the combiner. Immutable once built; every dashboard render rebuilds it
/// from the files on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricTable {
    /// Metric columns, in requested order (per file) or ordered union
    /// of the source tables' columns (combined)
    pub columns: Vec<String>,
    pub rows: Vec<MetricRow>,
}

impl MetricTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether this metric was recorded as a column. Column presence is the
    /// only signal for "metric never recorded"; a `0.0` cell means "no
    /// sample at this instant", not "never recorded".
    pub fn has_metric(&self, metric: &str) -> bool {
        self.columns.iter().any(|c| c == metric)
    }

    /// Earliest and latest `date_time` across all rows, or `None` for an
    /// empty table. This is the "data recorded from X to Y" span the
    /// dashboard shows, and the bound the range filter validates against.
    pub fn span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = self.rows.first()?.date_time;
        let mut min = first;
        let mut max = first;
        for row in &self.rows {
            if row.date_time < min {
                min = row.date_time;
            }
            if row.date_time > max {
                max = row.date_time;
            }
        }
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_groups_match_catalog() {
        for group in MetricGroup::ALL {
            for key in group.metrics() {
                assert!(
                    metric_info(key).is_some(),
                    "group {} names unknown metric {}",
                    group.as_str(),
                    key
                );
            }
        }
    }

    #[test]
    fn test_group_round_trip() {
        for group in MetricGroup::ALL {
            assert_eq!(MetricGroup::from_name(group.as_str()), Some(group));
        }
        assert_eq!(MetricGroup::from_name("type99"), None);
    }

    #[test]
    fn test_all_metrics_matches_catalog_order() {
        let keys: Vec<&str> = METRIC_CATALOG.iter().map(|info| info.key).collect();
        assert_eq!(keys, ALL_METRICS);
    }

    #[test]
    fn test_empty_table_has_no_span() {
        assert!(MetricTable::default().span().is_none());
    }
}
