//! Core types for the tank monitor.
//!
//! Holds the reading / classification data model, the error taxonomy, the
//! time-label normalizer, number formatting helpers and CLI settings shared
//! by the data, UI and binary crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{MonitorError, Result};
