//! Memoized aggregate queries over the loaded dataset.
//!
//! [`AggregationEngine`] owns the [`Dataset`] and layers memoization caches
//! on top of it. Every result is a pure function of the dataset, which never
//! changes after load, so no cache is ever invalidated. Callers use `&mut`
//! access because a first query populates its cache entry.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use lens_core::models::{Dataset, PropertyMetric, VaccinationKind, VaccinationRecord};

use crate::averages::PropertyAverager;

// ── AggregationEngine ─────────────────────────────────────────────────────────

/// Memoizing query engine over an immutable dataset.
pub struct AggregationEngine {
    /// Loaded records, read-only for the engine's lifetime.
    dataset: Dataset,
    /// Sum of all known populations, computed on first request.
    total_population: Option<u64>,
    /// Per-ZIP rate mappings keyed by (kind, date).
    vaccination_cache: HashMap<(VaccinationKind, NaiveDate), BTreeMap<String, f64>>,
    /// Memoized market value averages.
    market_value: PropertyAverager,
    /// Memoized livable area averages.
    livable_area: PropertyAverager,
    /// Per-ZIP market value per capita results.
    per_capita_cache: HashMap<String, u64>,
    /// Full record-sequence scans performed outside the averagers.
    scans: u64,
}

impl AggregationEngine {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            total_population: None,
            vaccination_cache: HashMap::new(),
            market_value: PropertyAverager::new(PropertyMetric::MarketValue),
            livable_area: PropertyAverager::new(PropertyMetric::LivableArea),
            per_capita_cache: HashMap::new(),
            scans: 0,
        }
    }

    /// The records this engine answers queries over.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    // ── Population ────────────────────────────────────────────────────────

    /// Sum of every known ZIP population.
    pub fn total_population(&mut self) -> u64 {
        if let Some(total) = self.total_population {
            return total;
        }
        self.scans += 1;
        let total = self.dataset.populations.values().sum();
        self.total_population = Some(total);
        total
    }

    // ── Vaccinations ──────────────────────────────────────────────────────

    /// Per-ZIP vaccination rate for `kind` on `date`, sorted by ZIP.
    ///
    /// For each ZIP the observation with the latest timestamp on `date` is
    /// selected; an equal timestamp replaces the earlier record, so the last
    /// one seen in input order wins. ZIPs with a zero count, a zero
    /// population, or no known population are omitted. Rates are rounded
    /// half-up to four decimal places.
    pub fn vaccinations_per_capita(
        &mut self,
        kind: VaccinationKind,
        date: NaiveDate,
    ) -> &BTreeMap<String, f64> {
        let dataset = &self.dataset;
        let scans = &mut self.scans;
        self.vaccination_cache.entry((kind, date)).or_insert_with(|| {
            *scans += 1;
            let rates = compute_rates(dataset, kind, date);
            tracing::debug!(
                kind = kind.as_str(),
                %date,
                zips = rates.len(),
                "vaccination rates computed"
            );
            rates
        })
    }

    // ── Properties ────────────────────────────────────────────────────────

    /// Mean market value over all assessments in `zip`, truncated toward
    /// zero. Returns 0 when the ZIP has no assessments.
    pub fn average_market_value(&mut self, zip: &str) -> u64 {
        self.market_value.average(zip, &self.dataset.properties)
    }

    /// Mean livable area over all assessments in `zip`, truncated toward
    /// zero. Returns 0 when the ZIP has no assessments.
    pub fn average_livable_area(&mut self, zip: &str) -> u64 {
        self.livable_area.average(zip, &self.dataset.properties)
    }

    /// Total market value in `zip` divided by its population, truncated
    /// toward zero. Returns 0 when the ZIP has no assessments or no usable
    /// population.
    pub fn market_value_per_capita(&mut self, zip: &str) -> u64 {
        if let Some(&cached) = self.per_capita_cache.get(zip) {
            return cached;
        }

        self.scans += 1;
        let mut total = 0.0;
        let mut count = 0u64;
        for record in self.dataset.properties.iter().filter(|record| record.zip == zip) {
            total += record.market_value;
            count += 1;
        }

        let result = match self.dataset.population(zip) {
            Some(population) if population > 0 && count > 0 => (total / population as f64) as u64,
            _ => 0,
        };
        self.per_capita_cache.insert(zip.to_string(), result);
        result
    }

    // ── Introspection ─────────────────────────────────────────────────────

    /// Full record-sequence scans performed so far, across every cache. The
    /// count is unchanged by a query served from a cache.
    pub fn scan_count(&self) -> u64 {
        self.scans + self.market_value.scan_count() + self.livable_area.scan_count()
    }
}

/// One full pass over the vaccination sequence for a (kind, date) pair.
fn compute_rates(
    dataset: &Dataset,
    kind: VaccinationKind,
    date: NaiveDate,
) -> BTreeMap<String, f64> {
    let mut latest: HashMap<&str, &VaccinationRecord> = HashMap::new();
    for record in &dataset.vaccinations {
        if record.date() != date {
            continue;
        }
        let slot = latest.entry(record.zip.as_str()).or_insert(record);
        // An equally timestamped record replaces the held one, so the last
        // record in input order wins exact ties.
        if record.timestamp >= slot.timestamp {
            *slot = record;
        }
    }

    let mut rates = BTreeMap::new();
    for (zip, record) in latest {
        let count = record.count_for(kind);
        if count == 0 {
            continue;
        }
        let Some(population) = dataset.population(zip) else {
            continue;
        };
        if population == 0 {
            continue;
        }
        let rate = (count as f64 / population as f64 * 10000.0).round() / 10000.0;
        rates.insert(zip.to_string(), rate);
    }
    rates
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use lens_core::models::PropertyRecord;

    // ── Helpers ───────────────────────────────────────────────────────────

    fn make_observation(zip: &str, timestamp: &str, partial: u64, full: u64) -> VaccinationRecord {
        VaccinationRecord {
            zip: zip.to_string(),
            timestamp: NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S")
                .expect("test timestamp"),
            partial_vaccinated: partial,
            full_vaccinated: full,
            positive_tests: 0,
            negative_tests: 0,
            boosters: 0,
            hospitalized: 0,
            deaths: 0,
        }
    }

    fn make_assessment(zip: &str, market_value: f64, livable_area: f64) -> PropertyRecord {
        PropertyRecord {
            zip: zip.to_string(),
            market_value,
            livable_area,
        }
    }

    fn make_dataset(
        vaccinations: Vec<VaccinationRecord>,
        properties: Vec<PropertyRecord>,
        populations: &[(&str, u64)],
    ) -> Dataset {
        Dataset::new(
            vaccinations,
            properties,
            populations
                .iter()
                .map(|(zip, population)| (zip.to_string(), *population))
                .collect(),
        )
    }

    fn march(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, day).expect("test date")
    }

    // ── Total population ──────────────────────────────────────────────────

    #[test]
    fn test_total_population_sums_all_zips() {
        let dataset = make_dataset(vec![], vec![], &[("19104", 1000), ("19103", 500)]);
        let mut engine = AggregationEngine::new(dataset);

        assert_eq!(engine.total_population(), 1500);
        assert_eq!(engine.total_population(), 1500);
        assert_eq!(engine.scan_count(), 1);
    }

    #[test]
    fn test_total_population_empty_dataset() {
        let mut engine = AggregationEngine::new(Dataset::default());
        assert_eq!(engine.total_population(), 0);
    }

    // ── Vaccinations per capita ───────────────────────────────────────────

    #[test]
    fn test_per_capita_uses_latest_observation_of_the_day() {
        let dataset = make_dataset(
            vec![
                make_observation("19104", "2021-03-01 12:00:00", 100, 50),
                make_observation("19104", "2021-03-01 13:00:00", 120, 60),
            ],
            vec![],
            &[("19104", 1000)],
        );
        let mut engine = AggregationEngine::new(dataset);

        let partial = engine.vaccinations_per_capita(VaccinationKind::Partial, march(1));
        assert_eq!(partial.get("19104"), Some(&0.12));

        let full = engine.vaccinations_per_capita(VaccinationKind::Full, march(1));
        assert_eq!(full.get("19104"), Some(&0.06));
    }

    #[test]
    fn test_per_capita_later_record_wins_regardless_of_input_order() {
        let dataset = make_dataset(
            vec![
                make_observation("19104", "2021-03-01 13:00:00", 120, 60),
                make_observation("19104", "2021-03-01 12:00:00", 100, 50),
            ],
            vec![],
            &[("19104", 1000)],
        );
        let mut engine = AggregationEngine::new(dataset);

        let full = engine.vaccinations_per_capita(VaccinationKind::Full, march(1));
        assert_eq!(full.get("19104"), Some(&0.06));
    }

    #[test]
    fn test_per_capita_equal_timestamps_last_seen_wins() {
        let dataset = make_dataset(
            vec![
                make_observation("19104", "2021-03-01 12:00:00", 0, 10),
                make_observation("19104", "2021-03-01 12:00:00", 0, 20),
            ],
            vec![],
            &[("19104", 1000)],
        );
        let mut engine = AggregationEngine::new(dataset);

        let full = engine.vaccinations_per_capita(VaccinationKind::Full, march(1));
        assert_eq!(full.get("19104"), Some(&0.02));
    }

    #[test]
    fn test_per_capita_ignores_other_dates() {
        let dataset = make_dataset(
            vec![
                make_observation("19104", "2021-03-01 12:00:00", 100, 50),
                make_observation("19104", "2021-03-02 09:00:00", 999, 999),
            ],
            vec![],
            &[("19104", 1000)],
        );
        let mut engine = AggregationEngine::new(dataset);

        let full = engine.vaccinations_per_capita(VaccinationKind::Full, march(1));
        assert_eq!(full.get("19104"), Some(&0.05));

        let none = engine.vaccinations_per_capita(VaccinationKind::Full, march(3));
        assert!(none.is_empty());
    }

    #[test]
    fn test_per_capita_omits_zero_counts() {
        let dataset = make_dataset(
            vec![make_observation("19104", "2021-03-01 12:00:00", 100, 0)],
            vec![],
            &[("19104", 1000)],
        );
        let mut engine = AggregationEngine::new(dataset);

        let full = engine.vaccinations_per_capita(VaccinationKind::Full, march(1));
        assert!(!full.contains_key("19104"));
    }

    #[test]
    fn test_per_capita_omits_zero_or_unknown_population() {
        let dataset = make_dataset(
            vec![
                make_observation("19103", "2021-03-01 12:00:00", 10, 10),
                make_observation("19104", "2021-03-01 12:00:00", 10, 10),
                make_observation("19199", "2021-03-01 12:00:00", 10, 10),
            ],
            vec![],
            &[("19103", 0), ("19104", 1000)],
        );
        let mut engine = AggregationEngine::new(dataset);

        let full = engine.vaccinations_per_capita(VaccinationKind::Full, march(1));
        assert_eq!(full.len(), 1);
        assert!(full.contains_key("19104"));
    }

    #[test]
    fn test_per_capita_rounds_half_up() {
        // 625 / 20000 * 10000 = 312.5, the exact midpoint: half-up gives
        // 313, so the rate is 0.0313 rather than 0.0312.
        let dataset = make_dataset(
            vec![make_observation("19104", "2021-03-01 12:00:00", 0, 625)],
            vec![],
            &[("19104", 20000)],
        );
        let mut engine = AggregationEngine::new(dataset);

        let full = engine.vaccinations_per_capita(VaccinationKind::Full, march(1));
        assert_eq!(full.get("19104"), Some(&0.0313));
    }

    #[test]
    fn test_per_capita_repeat_query_served_from_cache() {
        let dataset = make_dataset(
            vec![make_observation("19104", "2021-03-01 12:00:00", 100, 50)],
            vec![],
            &[("19104", 1000)],
        );
        let mut engine = AggregationEngine::new(dataset);

        let first = engine
            .vaccinations_per_capita(VaccinationKind::Full, march(1))
            .clone();
        let second = engine
            .vaccinations_per_capita(VaccinationKind::Full, march(1))
            .clone();
        assert_eq!(first, second);
        assert_eq!(engine.scan_count(), 1);

        // A different kind or date is a different cache entry.
        engine.vaccinations_per_capita(VaccinationKind::Partial, march(1));
        assert_eq!(engine.scan_count(), 2);
        engine.vaccinations_per_capita(VaccinationKind::Full, march(2));
        assert_eq!(engine.scan_count(), 3);
    }

    // ── Property metrics ──────────────────────────────────────────────────

    #[test]
    fn test_property_averages_and_per_capita() {
        let dataset = make_dataset(
            vec![],
            vec![
                make_assessment("19104", 200000.0, 1500.0),
                make_assessment("19104", 300000.0, 2500.0),
            ],
            &[("19104", 1000)],
        );
        let mut engine = AggregationEngine::new(dataset);

        assert_eq!(engine.average_market_value("19104"), 250000);
        assert_eq!(engine.average_livable_area("19104"), 2000);
        assert_eq!(engine.market_value_per_capita("19104"), 500);
    }

    #[test]
    fn test_market_value_per_capita_requires_population_and_records() {
        let dataset = make_dataset(
            vec![],
            vec![
                make_assessment("19103", 200000.0, 1500.0),
                make_assessment("19105", 200000.0, 1500.0),
            ],
            &[("19103", 0), ("19104", 1000)],
        );
        let mut engine = AggregationEngine::new(dataset);

        // Zero population.
        assert_eq!(engine.market_value_per_capita("19103"), 0);
        // Population known but no assessments.
        assert_eq!(engine.market_value_per_capita("19104"), 0);
        // Assessments but no population entry.
        assert_eq!(engine.market_value_per_capita("19105"), 0);
    }

    #[test]
    fn test_market_value_per_capita_is_memoized() {
        let dataset = make_dataset(
            vec![],
            vec![make_assessment("19104", 500000.0, 1500.0)],
            &[("19104", 1000)],
        );
        let mut engine = AggregationEngine::new(dataset);

        assert_eq!(engine.market_value_per_capita("19104"), 500);
        assert_eq!(engine.market_value_per_capita("19104"), 500);
        assert_eq!(engine.scan_count(), 1);
    }

    #[test]
    fn test_unknown_zip_property_queries_return_zero() {
        let mut engine = AggregationEngine::new(Dataset::default());

        assert_eq!(engine.average_market_value("19104"), 0);
        assert_eq!(engine.average_livable_area("19104"), 0);
        assert_eq!(engine.market_value_per_capita("19104"), 0);
    }
}
