//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

/// Admission policy applied per (tenant, phone) before a code is sent
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Attempts admitted before the post-limit wait applies
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Minimum seconds between two attempts
    #[serde(default = "default_cooldown_seconds")]
    pub cooldown_seconds: u64,

    /// Minutes to wait once the attempt limit is reached
    #[serde(default = "default_post_limit_wait_minutes")]
    pub post_limit_wait_minutes: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            cooldown_seconds: default_cooldown_seconds(),
            post_limit_wait_minutes: default_post_limit_wait_minutes(),
        }
    }
}

impl RateLimitConfig {
    /// Create a development configuration (no cooldown, generous limit)
    pub fn development() -> Self {
        Self {
            max_attempts: 50,
            cooldown_seconds: 0,
            post_limit_wait_minutes: 1,
        }
    }
}

fn default_max_attempts() -> u32 {
    5
}

fn default_cooldown_seconds() -> u64 {
    45
}

fn default_post_limit_wait_minutes() -> u64 {
    2
}
