//! Type definitions module
//!
//! - `response` - The uniform response envelope returned by every endpoint

pub mod response;

pub use response::ResponseEnvelope;
