//! Property assessment CSV reader.
//!
//! Assessment exports carry ZIP+4 codes and free-form numeric fields, so
//! ZIPs are truncated to their first five digits before validation and a
//! row survives only if its market value parses. Livable area defaults to
//! 0 when absent or malformed.

use std::fs::File;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use lens_core::error::{LensError, Result};
use lens_core::models::PropertyRecord;

use crate::validate::{column_index, require_column, zip_regex};

/// Read property assessments from `path`, preserving input order.
pub fn read_properties(path: &Path) -> Result<Vec<PropertyRecord>> {
    let file = File::open(path).map_err(|source| LensError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(file);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    let columns = column_index(&headers);
    let zip_idx = require_column(&columns, path, "zip_code")?;
    let value_idx = require_column(&columns, path, "market_value")?;
    let area_idx = require_column(&columns, path, "total_livable_area")?;

    let zip_re = zip_regex();
    let mut records = Vec::new();
    let mut skipped = 0u64;

    for row in reader.records() {
        let row = row?;

        let raw_zip = row.get(zip_idx).unwrap_or("").trim();
        // ZIP+4 and longer forms keep their leading five digits.
        let Some(zip) = raw_zip.get(..5).filter(|prefix| zip_re.is_match(prefix)) else {
            skipped += 1;
            continue;
        };

        let Some(market_value) = row
            .get(value_idx)
            .and_then(|value| value.trim().parse::<f64>().ok())
        else {
            skipped += 1;
            continue;
        };

        let livable_area = row
            .get(area_idx)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(0.0);

        records.push(PropertyRecord {
            zip: zip.to_string(),
            market_value,
            livable_area,
        });
    }

    debug!(
        "File {}: {} assessments read, {} rows skipped",
        path.display(),
        records.len(),
        skipped
    );

    Ok(records)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
