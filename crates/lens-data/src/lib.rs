//! Data ingestion layer for the ZIP lens.
//!
//! Reads the vaccination, property, and population files named on the
//! command line, validates raw rows into typed records, and assembles the
//! in-memory [`Dataset`](lens_core::models::Dataset) the query layer runs
//! on. Malformed rows are skipped, never fatal.

pub mod covid;
pub mod loader;
pub mod population;
pub mod property;
pub mod validate;

pub use lens_core as core;
