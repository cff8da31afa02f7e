use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{LensError, Result};

/// Which vaccination counter a per-capita query reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VaccinationKind {
    /// At least one dose received.
    Partial,
    /// Complete initial series received.
    Full,
}

impl FromStr for VaccinationKind {
    type Err = LensError;

    /// Case-insensitive construction from a string slice.
    ///
    /// Accepts `"partial"` and `"full"` (case-insensitive). Returns
    /// [`LensError::InvalidKind`] for unrecognised strings.
    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "partial" => Ok(VaccinationKind::Partial),
            "full" => Ok(VaccinationKind::Full),
            other => Err(LensError::InvalidKind(other.to_string())),
        }
    }
}

impl VaccinationKind {
    /// The canonical lowercase string identifier for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            VaccinationKind::Partial => "partial",
            VaccinationKind::Full => "full",
        }
    }
}

impl fmt::Display for VaccinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single per-ZIP vaccination/testing observation at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaccinationRecord {
    /// 5-digit ZIP code the observation belongs to.
    pub zip: String,
    /// Reporting timestamp (the source format carries no zone).
    pub timestamp: NaiveDateTime,
    /// Residents with at least one dose as of this observation.
    #[serde(default)]
    pub partial_vaccinated: u64,
    /// Residents with a complete initial series as of this observation.
    #[serde(default)]
    pub full_vaccinated: u64,
    /// Cumulative positive test results.
    #[serde(default)]
    pub positive_tests: u64,
    /// Cumulative negative test results.
    #[serde(default)]
    pub negative_tests: u64,
    /// Booster doses administered.
    #[serde(default)]
    pub boosters: u64,
    /// Residents hospitalized.
    #[serde(default)]
    pub hospitalized: u64,
    /// Resident deaths.
    #[serde(default)]
    pub deaths: u64,
}

impl VaccinationRecord {
    /// Calendar date component of the observation timestamp.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// The counter selected by `kind`.
    pub fn count_for(&self, kind: VaccinationKind) -> u64 {
        match kind {
            VaccinationKind::Partial => self.partial_vaccinated,
            VaccinationKind::Full => self.full_vaccinated,
        }
    }
}

/// A single property assessment row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyRecord {
    /// 5-digit ZIP code the property lies in.
    pub zip: String,
    /// Assessed market value in dollars.
    pub market_value: f64,
    /// Livable area in square feet, 0 when the source row had none.
    #[serde(default)]
    pub livable_area: f64,
}

/// Which property field an average is taken over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyMetric {
    /// Assessed market value.
    MarketValue,
    /// Total livable area.
    LivableArea,
}

impl PropertyMetric {
    /// Read the field this metric averages from a record.
    pub fn extract(&self, record: &PropertyRecord) -> f64 {
        match self {
            PropertyMetric::MarketValue => record.market_value,
            PropertyMetric::LivableArea => record.livable_area,
        }
    }

    /// The canonical snake_case string identifier for this metric.
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyMetric::MarketValue => "market_value",
            PropertyMetric::LivableArea => "livable_area",
        }
    }
}

/// The three loaded datasets, fixed for the lifetime of a session.
///
/// Observation and assessment rows keep their input order; queries that
/// resolve ties between rows rely on it. Population holds at most one entry
/// per ZIP.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// Vaccination observations, in input order.
    #[serde(default)]
    pub vaccinations: Vec<VaccinationRecord>,
    /// Property assessments, in input order.
    #[serde(default)]
    pub properties: Vec<PropertyRecord>,
    /// ZIP code → resident population.
    #[serde(default)]
    pub populations: HashMap<String, u64>,
}

impl Dataset {
    /// Assemble a dataset from already-validated collections.
    pub fn new(
        vaccinations: Vec<VaccinationRecord>,
        properties: Vec<PropertyRecord>,
        populations: HashMap<String, u64>,
    ) -> Self {
        Dataset {
            vaccinations,
            properties,
            populations,
        }
    }

    /// Population of `zip`, or `None` when the ZIP is not in the mapping.
    pub fn population(&self, zip: &str) -> Option<u64> {
        self.populations.get(zip).copied()
    }
}
