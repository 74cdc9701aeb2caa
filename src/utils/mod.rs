//! Utility modules.

pub mod formatting;

pub use formatting::{format_cell, format_number};
