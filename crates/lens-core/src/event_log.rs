//! Timestamped trail of user interactions.
//!
//! Distinct from the `tracing` diagnostics: this log is a plain append-only
//! record of what the user asked for, written to stderr or to the file named
//! by `--log`. Constructed once at startup and passed by mutable reference
//! into the components that record interactions.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use chrono::Utc;
use tracing::warn;

use crate::error::{LensError, Result};

/// Append-only interaction log.
///
/// Each entry is a single line of the form `"<unix_millis> <message>"`,
/// flushed immediately so the trail survives an abrupt exit.
pub struct EventLog {
    sink: Box<dyn Write>,
}

impl fmt::Debug for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLog").finish_non_exhaustive()
    }
}

impl EventLog {
    /// A log writing to standard error (the default destination).
    pub fn to_stderr() -> Self {
        EventLog {
            sink: Box::new(io::stderr()),
        }
    }

    /// A log appending to the file at `path`, creating it if absent.
    pub fn to_file(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .map_err(|source| LensError::LogFile {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(EventLog {
            sink: Box::new(file),
        })
    }

    /// Append one timestamped entry.
    ///
    /// A failed write does not interrupt the session; it is reported through
    /// the diagnostic layer instead.
    pub fn log(&mut self, message: &str) {
        let millis = Utc::now().timestamp_millis();
        let result = writeln!(self.sink, "{} {}", millis, message).and_then(|_| self.sink.flush());
        if let Err(err) = result {
            warn!(error = %err, "interaction log write failed");
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
