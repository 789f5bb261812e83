//! Shared utilities and common types for the SMS verification server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Envelope codes and the response envelope
//! - Utility functions (phone validation and masking)

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuditConfig, LoggingConfig, ProvidersConfig, RateLimitConfig, RedisConfig,
    ServerConfig, SmsConfig,
};
pub use errors::error_codes;
pub use types::ResponseEnvelope;
pub use utils::phone;
