//! Domain layer containing entities and the key-value store layout.

pub mod entities;
pub mod keys;

// Re-export commonly used domain types
pub use entities::*;
pub use keys::{fields, format_timestamp, parse_timestamp, year_month, KeySpace};
