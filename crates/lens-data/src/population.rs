//! Population CSV reader.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use lens_core::error::{LensError, Result};

use crate::validate::{column_index, require_column, zip_regex};

/// Read the ZIP to population map from `path`. A ZIP appearing more than
/// once keeps its last value.
pub fn read_population(path: &Path) -> Result<HashMap<String, u64>> {
    let file = File::open(path).map_err(|source| LensError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(file);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Ok(HashMap::new());
    }
    let columns = column_index(&headers);
    let zip_idx = require_column(&columns, path, "zip_code")?;
    let pop_idx = require_column(&columns, path, "population")?;

    let zip_re = zip_regex();
    let mut populations = HashMap::new();
    let mut skipped = 0u64;

    for row in reader.records() {
        let row = row?;

        let zip = row.get(zip_idx).unwrap_or("").trim();
        if !zip_re.is_match(zip) {
            skipped += 1;
            continue;
        }

        let Some(population) = row
            .get(pop_idx)
            .and_then(|value| value.trim().parse::<u64>().ok())
        else {
            skipped += 1;
            continue;
        };

        populations.insert(zip.to_string(), population);
    }

    debug!(
        "File {}: {} ZIP populations read, {} rows skipped",
        path.display(),
        populations.len(),
        skipped
    );

    Ok(populations)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
