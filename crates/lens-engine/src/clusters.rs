//! Wellness cluster discovery.
//!
//! A cluster is a maximal set of numerically adjacent ZIP codes (integer
//! values differing by exactly 1) whose members each satisfy a minimum
//! full-vaccination rate, average livable area, and population. A ZIP
//! failing a threshold cuts the adjacency graph: reachability never
//! propagates through it.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use lens_core::models::VaccinationKind;

use crate::aggregate::AggregationEngine;

// ── Criteria ──────────────────────────────────────────────────────────────────

/// Thresholds every cluster member must meet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterCriteria {
    /// Minimum full-vaccination rate per capita.
    pub min_rate: f64,
    /// Minimum average livable area.
    pub min_area: u64,
    /// Minimum ZIP population.
    pub min_population: u64,
}

// ── ClusterFinder ─────────────────────────────────────────────────────────────

/// Breadth-first search over the numeric ZIP adjacency graph.
pub struct ClusterFinder;

impl ClusterFinder {
    /// Find all clusters for `date`, ordered by their first-encountered
    /// start node (ascending ZIP).
    pub fn find(
        engine: &mut AggregationEngine,
        date: NaiveDate,
        criteria: &ClusterCriteria,
    ) -> Vec<BTreeSet<String>> {
        let rates = engine
            .vaccinations_per_capita(VaccinationKind::Full, date)
            .clone();

        // Candidate nodes: ZIPs with a rate for the date and a large enough
        // population. A ZIP with no data for the date can never be a node.
        let mut nodes: BTreeMap<String, f64> = BTreeMap::new();
        for (zip, &rate) in &rates {
            let Some(population) = engine.dataset().population(zip) else {
                continue;
            };
            if population >= criteria.min_population {
                nodes.insert(zip.clone(), rate);
            }
        }

        // Numeric index; adjacency is a value±1 lookup instead of an
        // all-pairs comparison. Leading zeros are not significant here.
        let mut by_value: HashMap<u32, (&str, f64)> = HashMap::new();
        for (zip, &rate) in &nodes {
            if let Ok(value) = zip.parse::<u32>() {
                by_value.insert(value, (zip.as_str(), rate));
            }
        }

        let mut visited: HashSet<&str> = HashSet::new();
        let mut clusters: Vec<BTreeSet<String>> = Vec::new();

        for (zip, &rate) in &nodes {
            if visited.contains(zip.as_str()) {
                continue;
            }
            visited.insert(zip.as_str());
            // A failing start node seeds no cluster and is never absorbed
            // into a later one.
            if !Self::qualifies(engine, zip, rate, criteria) {
                continue;
            }

            let mut cluster = BTreeSet::new();
            cluster.insert(zip.clone());
            let mut frontier: VecDeque<&str> = VecDeque::new();
            frontier.push_back(zip.as_str());

            while let Some(current) = frontier.pop_front() {
                for (neighbor, neighbor_rate) in Self::neighbors(current, &by_value) {
                    if visited.contains(neighbor) {
                        continue;
                    }
                    // An unqualified neighbor is marked visited but excluded,
                    // so it never carries reachability past itself.
                    visited.insert(neighbor);
                    if Self::qualifies(engine, neighbor, neighbor_rate, criteria) {
                        cluster.insert(neighbor.to_string());
                        frontier.push_back(neighbor);
                    }
                }
            }

            clusters.push(cluster);
        }

        tracing::debug!(%date, clusters = clusters.len(), "cluster search finished");
        clusters
    }

    /// Rate and area thresholds; the population threshold was already
    /// applied when the node set was built.
    fn qualifies(
        engine: &mut AggregationEngine,
        zip: &str,
        rate: f64,
        criteria: &ClusterCriteria,
    ) -> bool {
        rate >= criteria.min_rate && engine.average_livable_area(zip) >= criteria.min_area
    }

    /// Node-set members whose integer value differs from `zip` by one.
    fn neighbors<'a>(zip: &str, by_value: &HashMap<u32, (&'a str, f64)>) -> Vec<(&'a str, f64)> {
        let Ok(value) = zip.parse::<u32>() else {
            return Vec::new();
        };
        let mut adjacent = Vec::new();
        if value > 0 {
            if let Some(&neighbor) = by_value.get(&(value - 1)) {
                adjacent.push(neighbor);
            }
        }
        if let Some(&neighbor) = by_value.get(&(value + 1)) {
            adjacent.push(neighbor);
        }
        adjacent
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use lens_core::models::{Dataset, PropertyRecord, VaccinationRecord};

    // ── Helpers ───────────────────────────────────────────────────────────

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, 1).expect("test date")
    }

    fn test_noon() -> NaiveDateTime {
        test_date().and_hms_opt(12, 0, 0).expect("test time")
    }

    /// Engine over one observation, one assessment, and one population
    /// entry per listed ZIP.
    fn engine_with(
        counts: &[(&str, u64)],
        areas: &[(&str, f64)],
        populations: &[(&str, u64)],
    ) -> AggregationEngine {
        let vaccinations = counts
            .iter()
            .map(|(zip, full)| VaccinationRecord {
                zip: zip.to_string(),
                timestamp: test_noon(),
                partial_vaccinated: 0,
                full_vaccinated: *full,
                positive_tests: 0,
                negative_tests: 0,
                boosters: 0,
                hospitalized: 0,
                deaths: 0,
            })
            .collect();
        let properties = areas
            .iter()
            .map(|(zip, area)| PropertyRecord {
                zip: zip.to_string(),
                market_value: 100000.0,
                livable_area: *area,
            })
            .collect();
        let populations = populations
            .iter()
            .map(|(zip, population)| (zip.to_string(), *population))
            .collect();
        AggregationEngine::new(Dataset::new(vaccinations, properties, populations))
    }

    fn criteria(min_rate: f64, min_area: u64, min_population: u64) -> ClusterCriteria {
        ClusterCriteria {
            min_rate,
            min_area,
            min_population,
        }
    }

    fn zips(cluster: &BTreeSet<String>) -> Vec<&str> {
        cluster.iter().map(String::as_str).collect()
    }

    // ── Basic shapes ──────────────────────────────────────────────────────

    #[test]
    fn test_consecutive_qualifying_zips_form_one_cluster() {
        let mut engine = engine_with(
            &[("19103", 60), ("19104", 60), ("19105", 60), ("19106", 60)],
            &[
                ("19103", 1000.0),
                ("19104", 1000.0),
                ("19105", 1000.0),
                ("19106", 100.0),
            ],
            &[("19103", 1000), ("19104", 1000), ("19105", 1000), ("19106", 1000)],
        );

        let clusters = ClusterFinder::find(&mut engine, test_date(), &criteria(0.05, 500, 100));

        assert_eq!(clusters.len(), 1);
        assert_eq!(zips(&clusters[0]), vec!["19103", "19104", "19105"]);
    }

    #[test]
    fn test_isolated_qualifying_zip_forms_singleton_cluster() {
        let mut engine = engine_with(&[("19104", 60)], &[("19104", 1000.0)], &[("19104", 1000)]);

        let clusters = ClusterFinder::find(&mut engine, test_date(), &criteria(0.05, 500, 100));

        assert_eq!(clusters.len(), 1);
        assert_eq!(zips(&clusters[0]), vec!["19104"]);
    }

    #[test]
    fn test_no_data_yields_no_clusters() {
        let mut engine = AggregationEngine::new(Dataset::default());
        let clusters = ClusterFinder::find(&mut engine, test_date(), &criteria(0.05, 500, 100));
        assert!(clusters.is_empty());
    }

    // ── Graph cuts ────────────────────────────────────────────────────────

    #[test]
    fn test_disqualified_zip_cuts_the_graph() {
        // 19105 fails the area threshold, splitting an otherwise contiguous
        // run into two clusters.
        let mut engine = engine_with(
            &[
                ("19103", 60),
                ("19104", 60),
                ("19105", 60),
                ("19106", 60),
                ("19107", 60),
            ],
            &[
                ("19103", 1000.0),
                ("19104", 1000.0),
                ("19105", 100.0),
                ("19106", 1000.0),
                ("19107", 1000.0),
            ],
            &[
                ("19103", 1000),
                ("19104", 1000),
                ("19105", 1000),
                ("19106", 1000),
                ("19107", 1000),
            ],
        );

        let clusters = ClusterFinder::find(&mut engine, test_date(), &criteria(0.05, 500, 100));

        assert_eq!(clusters.len(), 2);
        assert_eq!(zips(&clusters[0]), vec!["19103", "19104"]);
        assert_eq!(zips(&clusters[1]), vec!["19106", "19107"]);
    }

    #[test]
    fn test_low_population_zip_is_not_a_node() {
        let mut engine = engine_with(
            &[("19104", 60), ("19105", 60), ("19106", 60)],
            &[("19104", 1000.0), ("19105", 1000.0), ("19106", 1000.0)],
            &[("19104", 1000), ("19105", 50), ("19106", 1000)],
        );

        let clusters = ClusterFinder::find(&mut engine, test_date(), &criteria(0.05, 500, 100));

        assert_eq!(clusters.len(), 2);
        assert_eq!(zips(&clusters[0]), vec!["19104"]);
        assert_eq!(zips(&clusters[1]), vec!["19106"]);
    }

    #[test]
    fn test_low_rate_zip_is_excluded() {
        let mut engine = engine_with(
            &[("19103", 60), ("19104", 10)],
            &[("19103", 1000.0), ("19104", 1000.0)],
            &[("19103", 1000), ("19104", 1000)],
        );

        let clusters = ClusterFinder::find(&mut engine, test_date(), &criteria(0.05, 500, 100));

        assert_eq!(clusters.len(), 1);
        assert_eq!(zips(&clusters[0]), vec!["19103"]);
    }

    #[test]
    fn test_zip_without_rate_data_is_not_a_node() {
        // 19104 reports a zero count, so it has no rate entry and splits
        // its neighbors even though its population and area are fine.
        let mut engine = engine_with(
            &[("19103", 60), ("19104", 0), ("19105", 60)],
            &[("19103", 1000.0), ("19104", 1000.0), ("19105", 1000.0)],
            &[("19103", 1000), ("19104", 1000), ("19105", 1000)],
        );

        let clusters = ClusterFinder::find(&mut engine, test_date(), &criteria(0.05, 500, 100));

        assert_eq!(clusters.len(), 2);
        assert_eq!(zips(&clusters[0]), vec!["19103"]);
        assert_eq!(zips(&clusters[1]), vec!["19105"]);
    }

    // ── Adjacency ─────────────────────────────────────────────────────────

    #[test]
    fn test_adjacency_ignores_leading_zeros() {
        let mut engine = engine_with(
            &[("00999", 60), ("01000", 60)],
            &[("00999", 1000.0), ("01000", 1000.0)],
            &[("00999", 1000), ("01000", 1000)],
        );

        let clusters = ClusterFinder::find(&mut engine, test_date(), &criteria(0.05, 500, 100));

        assert_eq!(clusters.len(), 1);
        assert_eq!(zips(&clusters[0]), vec!["00999", "01000"]);
    }

    #[test]
    fn test_gap_of_two_is_not_adjacent() {
        let mut engine = engine_with(
            &[("19103", 60), ("19105", 60)],
            &[("19103", 1000.0), ("19105", 1000.0)],
            &[("19103", 1000), ("19105", 1000)],
        );

        let clusters = ClusterFinder::find(&mut engine, test_date(), &criteria(0.05, 500, 100));

        assert_eq!(clusters.len(), 2);
    }

    // ── Laws ──────────────────────────────────────────────────────────────

    #[test]
    fn test_members_satisfy_every_threshold_and_do_not_overlap() {
        let thresholds = criteria(0.05, 500, 100);
        let mut engine = engine_with(
            &[
                ("19103", 60),
                ("19104", 60),
                ("19105", 10),
                ("19106", 60),
                ("19107", 60),
            ],
            &[
                ("19103", 1000.0),
                ("19104", 600.0),
                ("19105", 1000.0),
                ("19106", 1000.0),
                ("19107", 400.0),
            ],
            &[
                ("19103", 1000),
                ("19104", 1000),
                ("19105", 1000),
                ("19106", 1000),
                ("19107", 1000),
            ],
        );

        let clusters = ClusterFinder::find(&mut engine, test_date(), &thresholds);
        let rates = engine
            .vaccinations_per_capita(VaccinationKind::Full, test_date())
            .clone();

        let mut seen: HashSet<String> = HashSet::new();
        for cluster in &clusters {
            for zip in cluster {
                assert!(rates[zip] >= thresholds.min_rate);
                assert!(engine.average_livable_area(zip) >= thresholds.min_area);
                assert!(engine.dataset().population(zip).unwrap() >= thresholds.min_population);
                assert!(seen.insert(zip.clone()), "{} appears twice", zip);
            }
        }
    }
}
