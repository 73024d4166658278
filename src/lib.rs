//! tablestats - sample column statistics over generated benchmark tables
//!
//! Regenerates a table's rows for a given scale factor, scans them once under an
//! optional row filter, and produces per-column statistics (null fraction,
//! distinct-value estimate, min/max, average width) used to check a query
//! optimizer's estimates against ground truth.

pub mod config;
pub mod core;
pub mod statistics;
pub mod utils;
