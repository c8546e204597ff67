//! Terminal UI layer for the tank monitor.
//!
//! Provides themes, the dashboard header, the readings table with its
//! summary block, and the interactive event loop built on [`ratatui`].

pub mod app;
pub mod components;
pub mod table_view;
pub mod themes;

pub use monitor_core as core;
