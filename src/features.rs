//! Feature derivation
//!
//! This module derives calendar and activity features from the timestamp
//! column of an aligned table:
//! - Civil date-time, date, weekday name, hour of day
//! - Time-of-day bucket (Morning/Afternoon/Evening/Night)
//! - Activity category decoded from the `act_type` channel

use crate::types::{ActivityCategory, MetricRow, TimeRange, ACT_TYPE_METRIC};
use chrono::{DateTime, Timelike};
use std::collections::BTreeMap;

/// Bucket an hour of day into a coarse time-of-day label.
///
/// Boundaries: [6,12) Morning, [12,18) Afternoon, [18,24) Evening,
/// everything else Night.
pub fn categorize_hour(hour: u32) -> TimeRange {
    match hour {
        6..=11 => TimeRange::Morning,
        12..=17 => TimeRange::Afternoon,
        18..=23 => TimeRange::Evening,
        _ => TimeRange::Night,
    }
}

/// Decode a raw `act_type` code into its activity category.
///
/// The device emits 0-3 for known states; any other value means the band
/// was off the wrist.
pub fn categorize_act_type(code: f64) -> ActivityCategory {
    if code == 0.0 {
        ActivityCategory::Idle
    } else if code == 1.0 {
        ActivityCategory::Walking
    } else if code == 2.0 {
        ActivityCategory::Running
    } else if code == 3.0 {
        ActivityCategory::Unknown
    } else {
        ActivityCategory::Offwrist
    }
}

/// Build one table row from a joined timestamp and its metric cells,
/// deriving all calendar features.
///
/// Returns `None` when the timestamp falls outside chrono's representable
/// range; the builder drops such rows rather than failing the table.
pub fn derive_row(
    timestamp: f64,
    values: BTreeMap<String, f64>,
    has_act_type: bool,
) -> Option<MetricRow> {
    let secs = timestamp.trunc() as i64;
    let nanos = (timestamp.fract() * 1e9) as u32;
    let date_time = DateTime::from_timestamp(secs, nanos)?;

    let hour = date_time.hour();
    let act_category = if has_act_type {
        values.get(ACT_TYPE_METRIC).copied().map(categorize_act_type)
    } else {
        None
    };

    Some(MetricRow {
        timestamp,
        date: date_time.date_naive(),
        weekday: date_time.format("%A").to_string(),
        hour,
        time_range: categorize_hour(hour),
        act_category,
        date_time,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_hour_buckets_are_boundary_exact() {
        assert_eq!(categorize_hour(6), TimeRange::Morning);
        assert_eq!(categorize_hour(11), TimeRange::Morning);
        assert_eq!(categorize_hour(12), TimeRange::Afternoon);
        assert_eq!(categorize_hour(17), TimeRange::Afternoon);
        assert_eq!(categorize_hour(18), TimeRange::Evening);
        assert_eq!(categorize_hour(23), TimeRange::Evening);
        assert_eq!(categorize_hour(0), TimeRange::Night);
        assert_eq!(categorize_hour(5), TimeRange::Night);
    }

    #[test]
    fn test_act_type_mapping() {
        assert_eq!(categorize_act_type(0.0), ActivityCategory::Idle);
        assert_eq!(categorize_act_type(1.0), ActivityCategory::Walking);
        assert_eq!(categorize_act_type(2.0), ActivityCategory::Running);
        assert_eq!(categorize_act_type(3.0), ActivityCategory::Unknown);
        assert_eq!(categorize_act_type(5.0), ActivityCategory::Offwrist);
        assert_eq!(categorize_act_type(-1.0), ActivityCategory::Offwrist);
        assert_eq!(categorize_act_type(1.5), ActivityCategory::Offwrist);
    }

    #[test]
    fn test_derive_row_calendar_fields() {
        // 2023-11-14 22:13:20 UTC, a Tuesday
        let row = derive_row(1700000000.0, BTreeMap::new(), false).unwrap();

        assert_eq!(row.date.to_string(), "2023-11-14");
        assert_eq!(row.weekday, "Tuesday");
        assert_eq!(row.hour, 22);
        assert_eq!(row.time_range, TimeRange::Evening);
        assert_eq!(row.act_category, None);
    }

    #[test]
    fn test_derive_row_act_category() {
        let mut values = BTreeMap::new();
        values.insert(ACT_TYPE_METRIC.to_string(), 2.0);

        let row = derive_row(1700000000.0, values, true).unwrap();
        assert_eq!(row.act_category, Some(ActivityCategory::Running));
    }

    #[test]
    fn test_derive_row_rejects_out_of_range_timestamp() {
        assert!(derive_row(f64::MAX, BTreeMap::new(), false).is_none());
    }
}
