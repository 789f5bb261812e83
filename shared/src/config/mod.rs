//! Configuration module with service-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `server` - HTTP listener configuration
//! - `redis` - Key-value store connection and pool configuration
//! - `rate_limit` - Admission policy for verification requests
//! - `sms` - Verification lifecycle (TTLs, active provider, admin secret)
//! - `providers` - Vendor credentials and endpoints
//! - `audit` - External audit sink and background worker
//! - `environment` - Logging configuration

pub mod audit;
pub mod environment;
pub mod providers;
pub mod rate_limit;
pub mod redis;
pub mod server;
pub mod sms;

use serde::{Deserialize, Serialize};

pub use audit::AuditConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use providers::{MockProviderConfig, ProvidersConfig, SinchConfig, ZenviaConfig};
pub use rate_limit::RateLimitConfig;
pub use redis::RedisConfig;
pub use server::ServerConfig;
pub use sms::SmsConfig;

/// Complete application configuration combining all sub-configurations
///
/// Every section carries defaults, so a partial file (or no file at all)
/// deserializes into a runnable configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Key-value store configuration
    #[serde(default)]
    pub redis: RedisConfig,

    /// Verification lifecycle configuration
    #[serde(default)]
    pub sms: SmsConfig,

    /// Vendor configuration
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Audit sink configuration
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}
