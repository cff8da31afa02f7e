//! Console interface for the ZIP lens.
//!
//! A line-oriented menu over any `BufRead`/`Write` pair, dispatching user
//! actions to the query façade and echoing results as plain text.

pub mod menu;

pub use lens_core as core;
