//! Verification vendor configuration module

use serde::{Deserialize, Serialize};

/// Credentials and endpoints for every supported vendor
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub sinch: SinchConfig,

    #[serde(default)]
    pub zenvia: ZenviaConfig,

    #[serde(default)]
    pub mock: MockProviderConfig,

    /// Timeout applied to every vendor HTTP call, in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
}

/// Sinch verification API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SinchConfig {
    /// Base URL of the verification API
    #[serde(default = "default_sinch_base_url")]
    pub base_url: String,

    /// Pre-encoded basic-auth credential sent as `Authorization: Basic <key>`
    #[serde(default)]
    pub auth_key: String,

    /// Value of the Accept-Language header, selects the SMS template language
    #[serde(default = "default_sinch_language")]
    pub language: String,

    /// Only phones with this prefix are sent through the vendor
    #[serde(default = "default_sinch_country_prefix")]
    pub country_prefix: String,
}

impl Default for SinchConfig {
    fn default() -> Self {
        Self {
            base_url: default_sinch_base_url(),
            auth_key: String::new(),
            language: default_sinch_language(),
            country_prefix: default_sinch_country_prefix(),
        }
    }
}

/// Zenvia SMS API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ZenviaConfig {
    /// Message endpoint URL
    #[serde(default = "default_zenvia_url")]
    pub url: String,

    /// API token sent as `X-API-TOKEN`
    #[serde(default)]
    pub api_token: String,

    /// Sender identifier
    #[serde(default)]
    pub from: String,
}

impl Default for ZenviaConfig {
    fn default() -> Self {
        Self {
            url: default_zenvia_url(),
            api_token: String::new(),
            from: String::new(),
        }
    }
}

/// In-process provider used for development and tests
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MockProviderConfig {
    /// The only code the mock provider accepts
    #[serde(default = "default_mock_code")]
    pub accepted_code: String,
}

impl Default for MockProviderConfig {
    fn default() -> Self {
        Self {
            accepted_code: default_mock_code(),
        }
    }
}

fn default_http_timeout() -> u64 {
    15
}

fn default_sinch_base_url() -> String {
    String::from("https://verificationapi-v1.sinch.com/verification/v1")
}

fn default_sinch_language() -> String {
    String::from("pt-BR")
}

fn default_sinch_country_prefix() -> String {
    String::from("+55")
}

fn default_zenvia_url() -> String {
    String::from("https://api.zenvia.com/v1/channels/sms/messages")
}

fn default_mock_code() -> String {
    String::from("123456")
}
