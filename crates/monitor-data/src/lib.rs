//! Data layer for the tank monitor.
//!
//! Loads reading series from JSON / CSV files, runs the windowed
//! classification pipeline, accumulates sold / refilled totals and renders
//! CSV and text-report exports.

pub mod aggregator;
pub mod analysis;
pub mod analyzer;
pub mod export;
pub mod reader;
pub mod sample;

pub use monitor_core as core;
