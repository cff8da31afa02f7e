//! Dataset assembly.
//!
//! Each of the three sources is optional and loaded independently. A
//! source that fails to read contributes an empty collection instead of
//! aborting the program, with the failure recorded in the interaction
//! log and the diagnostic stream.

use std::collections::HashMap;
use std::path::Path;

use tracing::{info, warn};

use lens_core::event_log::EventLog;
use lens_core::models::Dataset;

use crate::covid::read_vaccinations;
use crate::population::read_population;
use crate::property::read_properties;

/// Load every provided source into a single [`Dataset`].
pub fn load_dataset(
    covid: Option<&Path>,
    properties: Option<&Path>,
    population: Option<&Path>,
    events: &mut EventLog,
) -> Dataset {
    let mut vaccinations = Vec::new();
    let mut assessments = Vec::new();
    let mut populations = HashMap::new();

    if let Some(path) = covid {
        match read_vaccinations(path) {
            Ok(records) => {
                info!("Loaded {} COVID records from {}", records.len(), path.display());
                events.log(&format!("Loaded {} COVID records", records.len()));
                vaccinations = records;
            }
            Err(err) => {
                warn!("Failed to read COVID data from {}: {}", path.display(), err);
                events.log(&format!("Error reading COVID data: {}", err));
            }
        }
    }

    if let Some(path) = properties {
        match read_properties(path) {
            Ok(records) => {
                info!("Loaded {} property records from {}", records.len(), path.display());
                events.log(&format!("Loaded {} property records", records.len()));
                assessments = records;
            }
            Err(err) => {
                warn!("Failed to read property data from {}: {}", path.display(), err);
                events.log(&format!("Error reading property data: {}", err));
            }
        }
    }

    if let Some(path) = population {
        match read_population(path) {
            Ok(entries) => {
                info!(
                    "Loaded population data for {} ZIP codes from {}",
                    entries.len(),
                    path.display()
                );
                events.log(&format!(
                    "Loaded population data for {} ZIP codes",
                    entries.len()
                ));
                populations = entries;
            }
            Err(err) => {
                warn!(
                    "Failed to read population data from {}: {}",
                    path.display(),
                    err
                );
                events.log(&format!("Error reading population data: {}", err));
            }
        }
    }

    Dataset::new(vaccinations, assessments, populations)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
