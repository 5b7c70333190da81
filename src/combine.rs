//! Multi-file combination
//!
//! A child's telemetry is spread across many session files in one flat
//! directory, each file name carrying the child id. This module discovers
//! the files for one child, builds a per-file table for each, and
//! concatenates them row-wise. A file that fails to load is logged and
//! skipped so one bad upload never hides the rest of the data.

use crate::error::TelemetryError;
use crate::record;
use crate::table::TableBuilder;
use crate::types::{MetricTable, ALL_METRICS};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Discover every session file for `child_id` under `directory` and build
/// one combined table from them.
///
/// Matching is substring-in-filename plus a `.json` extension. That is a
/// known foot-gun: the id `"63d8"` also matches `"963d8123....json"`.
/// Callers wanting exact matching must pass the full child id.
///
/// Matched files are processed in lexicographic name order. Zero matches,
/// or every match failing to load, yields an empty table rather than an
/// error; only an unlistable directory fails.
pub fn combine(child_id: &str, directory: &Path) -> Result<MetricTable, TelemetryError> {
    let matched = matching_files(child_id, directory)?;

    let mut tables = Vec::with_capacity(matched.len());
    for path in matched {
        match record::load(&path) {
            Ok(rec) => tables.push(TableBuilder::build(&rec, ALL_METRICS)),
            // Isolate-and-continue: a missing or malformed file is skipped
            Err(err) => warn!(path = %path.display(), %err, "skipping session file"),
        }
    }

    Ok(concat(tables))
}

/// Session files whose name contains `child_id` and ends with `.json`,
/// sorted by name for a deterministic iteration order
fn matching_files(child_id: &str, directory: &Path) -> Result<Vec<PathBuf>, TelemetryError> {
    let entries = fs::read_dir(directory).map_err(|e| TelemetryError::Io {
        path: directory.to_path_buf(),
        source: e,
    })?;

    let mut matched = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| TelemetryError::Io {
            path: directory.to_path_buf(),
            source: e,
        })?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.contains(child_id) && name.ends_with(".json") {
            matched.push(entry.path());
        }
    }
    matched.sort();
    Ok(matched)
}

/// Row-wise concatenation of per-file tables, preserving table order and
/// never deduplicating rows. The combined column set is the ordered union;
/// rows from a file lacking a metric simply carry no cell for it.
pub fn concat(tables: Vec<MetricTable>) -> MetricTable {
    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::new();

    for table in tables {
        for col in table.columns {
            if !columns.contains(&col) {
                columns.push(col);
            }
        }
        rows.extend(table.rows);
    }

    MetricTable { columns, rows }
}
