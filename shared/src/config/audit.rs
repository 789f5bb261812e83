//! Audit sink configuration module

use serde::{Deserialize, Serialize};

/// External audit sink and background worker configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuditConfig {
    /// Deliver events to the external sink; when off, events are discarded
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Base URL of the audit service
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Path appended to the endpoint for saving events
    #[serde(default = "default_save_path")]
    pub save_path: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Capacity of the in-process event queue
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            endpoint: default_endpoint(),
            save_path: default_save_path(),
            timeout_seconds: default_timeout(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl AuditConfig {
    /// Full URL events are posted to
    pub fn save_url(&self) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.save_path.trim_start_matches('/')
        )
    }
}

fn default_enabled() -> bool {
    true
}

fn default_endpoint() -> String {
    String::from("http://localhost:8090/api/logmachine")
}

fn default_save_path() -> String {
    String::from("/save")
}

fn default_timeout() -> u64 {
    10
}

fn default_queue_capacity() -> usize {
    1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_url_joins_single_slash() {
        let config = AuditConfig {
            endpoint: "http://audit.local/api/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.save_url(), "http://audit.local/api/save");
    }
}
