//! Reusable header widgets.

pub mod header;
