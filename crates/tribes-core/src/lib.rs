//! Domain types shared by the tier report crates.
//!
//! Holds the membership record model, the per-tier price classifier,
//! calendar-month helpers, CLI settings and the common error type.

pub mod error;
pub mod models;
pub mod pricing;
pub mod settings;
pub mod time_utils;
