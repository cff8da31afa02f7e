use clap::Parser;
use std::path::PathBuf;

use crate::error::{LensError, Result};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Aggregate queries over ZIP-keyed vaccination, property, and population data
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ziplens",
    about = "Aggregate queries over ZIP-keyed vaccination, property, and population data",
    version
)]
pub struct Settings {
    /// Vaccination data file (CSV, or JSON when the extension is .json)
    #[arg(long)]
    pub covid: Option<PathBuf>,

    /// Property assessment data file (CSV)
    #[arg(long)]
    pub properties: Option<PathBuf>,

    /// Population data file (CSV)
    #[arg(long)]
    pub population: Option<PathBuf>,

    /// Interaction log file (appended; stderr when omitted)
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Verify that every provided data file exists and is a regular file.
    ///
    /// The interaction log path is exempt – it is created on first write.
    pub fn validate(&self) -> Result<()> {
        for path in [&self.covid, &self.properties, &self.population]
            .into_iter()
            .flatten()
        {
            if !path.is_file() {
                return Err(LensError::DataFileNotFound(path.clone()));
            }
        }
        Ok(())
    }

    /// The log level with the `--debug` override applied.
    pub fn effective_log_level(&self) -> &str {
        if self.debug {
            "DEBUG"
        } else {
            &self.log_level
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
