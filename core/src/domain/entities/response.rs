//! Completed verification record, kept as audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed verification attempt
///
/// Successful responses carry the submitted code and the receive time;
/// responses archived from abandoned requests carry neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResponse {
    pub key: String,
    pub tenant: String,
    pub phone_number: String,
    pub send_order_id: String,
    pub billing_sequence: String,
    pub provider_message_id: String,
    pub validation_code: Option<String>,
    pub sent_at: DateTime<Utc>,
    pub received_at: Option<DateTime<Utc>>,
}

impl VerificationResponse {
    pub fn is_success(&self) -> bool {
        self.validation_code.is_some()
    }
}
