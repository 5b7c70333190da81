//! Raw record loading
//!
//! One JSON file per recording session, shaped as
//! `{ "data": [ { "<metric>": [ { "<epoch-seconds>": <value> } ] } ] }`.
//! Only the first element of `data` and the first dictionary of each
//! metric's inner list carry samples; anything beyond that is ignored.

use crate::error::TelemetryError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

/// Sparse per-metric series: timestamp key (string-encoded epoch seconds)
/// to sample value
pub type MetricSeries = BTreeMap<String, f64>;

/// A raw per-session telemetry document as written by the device uploader
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub data: Vec<BTreeMap<String, Vec<MetricSeries>>>,
}

impl RawRecord {
    /// Samples for one metric under the first data element, if the device
    /// recorded that metric in this session
    pub fn metric_series(&self, metric: &str) -> Option<&MetricSeries> {
        self.data.first()?.get(metric)?.first()
    }

    /// Metric keys present in this record
    pub fn metric_keys(&self) -> impl Iterator<Item = &str> {
        self.data.iter().take(1).flat_map(|m| m.keys()).map(String::as_str)
    }
}

/// Load a raw record from disk.
///
/// A missing file is reported as `NotFound` and malformed JSON as `Parse`;
/// the combiner treats both as "no data for this file" and moves on.
pub fn load(path: &Path) -> Result<RawRecord, TelemetryError> {
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => TelemetryError::NotFound(path.to_path_buf()),
        _ => TelemetryError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    serde_json::from_str(&text).map_err(|e| TelemetryError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_record() -> RawRecord {
        let json = r#"{
            "data": [{
                "bpm": [{"1700000000": 72.0, "1700000060": 75.5}],
                "steps": [{"1700000000": 12}]
            }]
        }"#;
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_metric_series_lookup() {
        let record = sample_record();

        let bpm = record.metric_series("bpm").unwrap();
        assert_eq!(bpm.len(), 2);
        assert_eq!(bpm.get("1700000000"), Some(&72.0));

        // Integer values deserialize as floats
        let steps = record.metric_series("steps").unwrap();
        assert_eq!(steps.get("1700000000"), Some(&12.0));

        assert!(record.metric_series("temperature").is_none());
    }

    #[test]
    fn test_metric_keys_from_first_element_only() {
        let json = r#"{
            "data": [
                {"bpm": [{"1700000000": 72.0}]},
                {"gsr": [{"1700000000": 1.5}]}
            ]
        }"#;
        let record: RawRecord = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = record.metric_keys().collect();
        assert_eq!(keys, vec!["bpm"]);
    }

    #[test]
    fn test_missing_data_field() {
        let record: RawRecord = serde_json::from_str("{}").unwrap();
        assert!(record.metric_series("bpm").is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(TelemetryError::NotFound(_))));
    }

    #[test]
    fn test_load_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"not valid json").unwrap();

        let result = load(&path);
        assert!(matches!(result, Err(TelemetryError::Parse { .. })));
    }

    #[test]
    fn test_load_valid_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"data": [{"bpm": [{"1700000000": 70.0}]}]}"#).unwrap();

        let record = load(&path).unwrap();
        assert_eq!(record.metric_series("bpm").unwrap().len(), 1);
    }
}
