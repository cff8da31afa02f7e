//! Core domain layer for the ZIP lens.
//!
//! Record types for the three ZIP-keyed datasets, the shared query enums,
//! the crate error type, CLI settings, the user-interaction log, and the
//! display formatting helpers used by the other lens crates.

pub mod error;
pub mod event_log;
pub mod formatting;
pub mod models;
pub mod settings;
