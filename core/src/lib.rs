//! # SMS Verification Core
//!
//! Verification lifecycle for phone ownership checks: rate-limited request
//! admission, request and response records in a key-value store, short-lived
//! token exchange, background audit shipping and the swappable provider
//! boundary.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
