use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDateTime;
use csv::StringRecord;
use regex::Regex;

use lens_core::error::{LensError, Result};

/// Timestamp layout used by every vaccination observation.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Pattern matching exactly five ASCII digits.
///
/// Compiled per call; readers build it once before their row loop.
pub fn zip_regex() -> Regex {
    Regex::new(r"^\d{5}$").expect("regex is valid")
}

/// Parse an observation timestamp, `None` when it does not match
/// [`TIMESTAMP_FORMAT`].
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).ok()
}

/// Lowercased, trimmed header name → column index.
///
/// Column order is not fixed in any of the source files; every reader
/// resolves its columns by name through this map.
pub fn column_index(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim().to_lowercase(), i))
        .collect()
}

/// Index of a column the reader cannot work without.
pub fn require_column(
    columns: &HashMap<String, usize>,
    path: &Path,
    name: &'static str,
) -> Result<usize> {
    columns
        .get(name)
        .copied()
        .ok_or_else(|| LensError::MissingColumn {
            path: path.to_path_buf(),
            column: name,
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
