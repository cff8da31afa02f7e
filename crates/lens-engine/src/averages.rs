//! Memoized per-ZIP property averages.

use std::collections::HashMap;

use lens_core::models::{PropertyMetric, PropertyRecord};

/// Averager for one property metric, memoized per ZIP.
///
/// The first query for a ZIP scans the full assessment sequence; every
/// later query for the same ZIP is served from the memo table. Valid only
/// because the assessment sequence never changes after load.
pub struct PropertyAverager {
    /// Field this averager extracts from each assessment.
    metric: PropertyMetric,
    /// Results of earlier queries, keyed by ZIP.
    memo: HashMap<String, u64>,
    /// Full scans of the assessment sequence performed so far.
    scans: u64,
}

impl PropertyAverager {
    pub fn new(metric: PropertyMetric) -> Self {
        Self {
            metric,
            memo: HashMap::new(),
            scans: 0,
        }
    }

    /// Mean of the metric over all assessments in `zip`, truncated toward
    /// zero. Returns 0 when the ZIP has no assessments.
    pub fn average(&mut self, zip: &str, properties: &[PropertyRecord]) -> u64 {
        if let Some(&cached) = self.memo.get(zip) {
            tracing::debug!(zip, metric = self.metric.as_str(), "returning memoized average");
            return cached;
        }

        self.scans += 1;
        let mut sum = 0.0;
        let mut count = 0u64;
        for record in properties.iter().filter(|record| record.zip == zip) {
            sum += self.metric.extract(record);
            count += 1;
        }

        let average = if count == 0 { 0 } else { (sum / count as f64) as u64 };
        self.memo.insert(zip.to_string(), average);
        average
    }

    /// Number of full scans performed.
    pub fn scan_count(&self) -> u64 {
        self.scans
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
