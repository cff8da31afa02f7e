//! Vaccination data readers.
//!
//! The file named by `--covid` is dispatched on its extension: `.json`
//! documents are parsed as an array of observation objects, anything else
//! is decoded as headered CSV. Rows failing ZIP or timestamp validation
//! are skipped; counter fields default to 0 when absent or unparseable.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde_json::Value;
use tracing::debug;

use lens_core::error::{LensError, Result};
use lens_core::models::VaccinationRecord;

use crate::validate::{column_index, parse_timestamp, require_column, zip_regex};

/// Read vaccination observations from `path`, preserving input order.
pub fn read_vaccinations(path: &Path) -> Result<Vec<VaccinationRecord>> {
    let is_json = path.extension().map(|ext| ext == "json").unwrap_or(false);
    if is_json {
        read_json(path)
    } else {
        read_csv(path)
    }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

fn read_csv(path: &Path) -> Result<Vec<VaccinationRecord>> {
    let file = File::open(path).map_err(|source| LensError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    // Flexible mode: a row with missing trailing fields is a malformed row
    // to be skipped, not a fatal decode error.
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(file);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    let columns = column_index(&headers);
    let zip_idx = require_column(&columns, path, "zip_code")?;
    let ts_idx = require_column(&columns, path, "timestamp")?;

    let zip_re = zip_regex();
    let mut records = Vec::new();
    let mut skipped = 0u64;

    for row in reader.records() {
        let row = row?;

        let zip = row.get(zip_idx).unwrap_or("").trim();
        if !zip_re.is_match(zip) {
            skipped += 1;
            continue;
        }

        let Some(timestamp) = row.get(ts_idx).and_then(parse_timestamp) else {
            skipped += 1;
            continue;
        };

        records.push(VaccinationRecord {
            zip: zip.to_string(),
            timestamp,
            partial_vaccinated: csv_counter(&row, &columns, "partial_vaccinated"),
            full_vaccinated: csv_counter(&row, &columns, "full_vaccinated"),
            positive_tests: csv_counter(&row, &columns, "pos"),
            negative_tests: csv_counter(&row, &columns, "neg"),
            boosters: csv_counter(&row, &columns, "boosters"),
            hospitalized: csv_counter(&row, &columns, "hospitalized"),
            deaths: csv_counter(&row, &columns, "deaths"),
        });
    }

    debug!(
        "File {}: {} observations read, {} rows skipped",
        path.display(),
        records.len(),
        skipped
    );

    Ok(records)
}

/// Parse an integer counter column, defaulting to 0 when the column is
/// absent, the field is empty, or the value does not parse.
fn csv_counter(row: &StringRecord, columns: &HashMap<String, usize>, name: &str) -> u64 {
    columns
        .get(name)
        .and_then(|&idx| row.get(idx))
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0)
}

// ── JSON ──────────────────────────────────────────────────────────────────────

fn read_json(path: &Path) -> Result<Vec<VaccinationRecord>> {
    let content = std::fs::read_to_string(path).map_err(|source| LensError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    // A root that is not an array is a container-level failure.
    let entries: Vec<Value> = serde_json::from_str(&content)?;

    let zip_re = zip_regex();
    let mut records = Vec::new();
    let mut skipped = 0u64;

    for entry in &entries {
        let zip = entry
            .get("zip_code")
            .and_then(Value::as_str)
            .unwrap_or("")
            .trim();
        if !zip_re.is_match(zip) {
            skipped += 1;
            continue;
        }

        let Some(timestamp) = entry
            .get("timestamp")
            .and_then(Value::as_str)
            .and_then(parse_timestamp)
        else {
            skipped += 1;
            continue;
        };

        records.push(VaccinationRecord {
            zip: zip.to_string(),
            timestamp,
            partial_vaccinated: json_counter(entry, "partial_vaccinated"),
            full_vaccinated: json_counter(entry, "full_vaccinated"),
            positive_tests: json_counter(entry, "pos"),
            negative_tests: json_counter(entry, "neg"),
            boosters: json_counter(entry, "boosters"),
            hospitalized: json_counter(entry, "hospitalized"),
            deaths: json_counter(entry, "deaths"),
        });
    }

    debug!(
        "File {}: {} observations read, {} entries skipped",
        path.display(),
        records.len(),
        skipped
    );

    Ok(records)
}

/// Counter fields accept JSON numbers or numeric strings, defaulting to 0
/// for anything else.
fn json_counter(entry: &Value, key: &str) -> u64 {
    match entry.get(key) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
