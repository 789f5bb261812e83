//! Verification lifecycle configuration module

use serde::{Deserialize, Serialize};

use super::rate_limit::RateLimitConfig;

/// Six months, the lifetime of an abandoned request record
const SIX_MONTHS_SECONDS: u64 = 6 * 30 * 24 * 60 * 60;

/// Verification lifecycle configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmsConfig {
    /// Provider activated at startup
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Shared secret guarding the provider switch; empty disables switching
    #[serde(default)]
    pub admin_key: String,

    /// Expiry of request records in seconds
    #[serde(default = "default_request_ttl")]
    pub request_ttl_seconds: u64,

    /// Expiry of verification tokens in seconds
    #[serde(default = "default_token_ttl")]
    pub token_ttl_seconds: u64,

    /// Admission policy
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            admin_key: String::new(),
            request_ttl_seconds: default_request_ttl(),
            token_ttl_seconds: default_token_ttl(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

fn default_provider() -> String {
    String::from("Sinch")
}

fn default_request_ttl() -> u64 {
    SIX_MONTHS_SECONDS
}

fn default_token_ttl() -> u64 {
    30 * 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sms_config_default() {
        let config = SmsConfig::default();
        assert_eq!(config.request_ttl_seconds, 15_552_000);
        assert_eq!(config.token_ttl_seconds, 1800);
        assert!(config.admin_key.is_empty());
    }
}
