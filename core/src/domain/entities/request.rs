//! In-flight verification record, one per (tenant, phone).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Billing linkage of a request that the provider accepted
///
/// Both values are set together or the request has no linkage at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingLink {
    pub billing_sequence: String,
    pub provider_message_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    /// Store key of the record
    pub key: String,
    pub tenant: String,
    pub phone_number: String,
    pub send_order_id: String,
    /// Present once the provider accepted the send and billing was allocated
    pub link: Option<BillingLink>,
    pub sent_at: DateTime<Utc>,
}

impl VerificationRequest {
    /// Whether the provider accepted a send for this request
    pub fn is_sent(&self) -> bool {
        self.link.is_some()
    }

    pub fn provider_message_id(&self) -> Option<&str> {
        self.link.as_ref().map(|l| l.provider_message_id.as_str())
    }

    pub fn billing_sequence(&self) -> Option<&str> {
        self.link.as_ref().map(|l| l.billing_sequence.as_str())
    }
}
