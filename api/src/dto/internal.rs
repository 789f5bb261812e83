use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /api/sms-internal/findToken`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct FindTokenRequest {
    #[validate(length(min = 1, max = 128))]
    pub token: String,
}

/// Query of `GET /api/sms-internal/provider`
///
/// `provider=?` asks for the active provider and needs no key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderQuery {
    pub provider: String,
    pub key: String,
}

impl ProviderQuery {
    pub const QUERY_ACTIVE: &'static str = "?";

    pub fn is_query(&self) -> bool {
        self.provider == Self::QUERY_ACTIVE
    }
}
