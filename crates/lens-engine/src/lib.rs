//! Aggregation layer for the ZIP lens.
//!
//! Computes population, vaccination, and property statistics over a loaded
//! [`Dataset`](lens_core::models::Dataset), memoizing per-query results, and
//! discovers clusters of numerically adjacent ZIP codes.

pub mod aggregate;
pub mod averages;
pub mod clusters;
pub mod data_manager;

pub use lens_core as core;
