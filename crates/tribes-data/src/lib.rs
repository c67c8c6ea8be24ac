//! Data layer for the tier report.
//!
//! Loads membership exports, aggregates members per tier and month with
//! annual-subscription projection, pivots the result and writes it as CSV.

pub mod aggregator;
pub mod analysis;
pub mod reader;
pub mod report;

pub use tribes_core as core;
