//! Short-lived token resolving a provider message id to the confirmed phone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Token written after a verification completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationToken {
    /// Store key, the provider message id
    pub key: String,
    pub data: TokenData,
    pub expires_at: DateTime<Utc>,
}

/// What a downstream consumer receives for a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenData {
    pub phone_number: String,
    pub validation_code: String,
}
