//! Query façade over the aggregation layer.
//!
//! [`DataManager`] is the single entry point the console menu talks to. It
//! owns the [`AggregationEngine`] and forwards every query, adding no logic
//! of its own.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use lens_core::models::{Dataset, VaccinationKind};

use crate::aggregate::AggregationEngine;
use crate::clusters::{ClusterCriteria, ClusterFinder};

pub struct DataManager {
    engine: AggregationEngine,
}

impl DataManager {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            engine: AggregationEngine::new(dataset),
        }
    }

    /// The records behind this manager.
    pub fn dataset(&self) -> &Dataset {
        self.engine.dataset()
    }

    /// Sum of every known ZIP population.
    pub fn total_population(&mut self) -> u64 {
        self.engine.total_population()
    }

    /// Per-ZIP vaccination rates for `kind` on `date`, sorted by ZIP.
    pub fn vaccinations_per_capita(
        &mut self,
        kind: VaccinationKind,
        date: NaiveDate,
    ) -> &BTreeMap<String, f64> {
        self.engine.vaccinations_per_capita(kind, date)
    }

    /// Mean market value over the ZIP's assessments, truncated toward zero.
    pub fn average_market_value(&mut self, zip: &str) -> u64 {
        self.engine.average_market_value(zip)
    }

    /// Mean livable area over the ZIP's assessments, truncated toward zero.
    pub fn average_livable_area(&mut self, zip: &str) -> u64 {
        self.engine.average_livable_area(zip)
    }

    /// Total market value divided by population, truncated toward zero.
    pub fn market_value_per_capita(&mut self, zip: &str) -> u64 {
        self.engine.market_value_per_capita(zip)
    }

    /// Wellness clusters for `date` under `criteria`.
    pub fn wellness_clusters(
        &mut self,
        date: NaiveDate,
        criteria: &ClusterCriteria,
    ) -> Vec<BTreeSet<String>> {
        ClusterFinder::find(&mut self.engine, date, criteria)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
