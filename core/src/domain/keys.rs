//! Key layout and field names of every record the service keeps in the store.
//!
//! | Record | Key |
//! |---|---|
//! | Request | `{ns}:rq:{tenant}:{phone}` |
//! | Response | `{ns}:rs:{YY:MM}:{tenant}:{billingSeq}` |
//! | Token | `{providerMessageId}` (never namespaced) |
//! | Audit fallback | `{ns}:logrq:{YY:MM}:{tenant}:{billingSeq}` / `{ns}:logrs:...` |
//! | Send-order counter | `{ns}:sq:global` |
//! | Billing counter | `{ns}:bil:{YY:MM}:{tenant}` |

use chrono::{DateTime, SecondsFormat, Utc};

/// Hash field names, shared with records written by earlier deployments
pub mod fields {
    pub const SEND_ORDER_ID: &str = "idp";
    pub const BILLING_SEQUENCE: &str = "sq";
    pub const PROVIDER_MESSAGE_ID: &str = "si";
    pub const SENT_AT: &str = "tsnd";
    pub const RECEIVED_AT: &str = "trcv";
    pub const PHONE_NUMBER: &str = "pn";
    pub const VALIDATION_CODE: &str = "vc";
    pub const AUDIT_VALIDATION_CODE: &str = "cv";
    pub const ATTEMPT_COUNT: &str = "tc";
    pub const LAST_ATTEMPT_AT: &str = "tcts";
    pub const LIFETIME_TOTAL: &str = "total";

    /// Request fields owned by an in-flight verification; removed once it completes
    pub const TRANSIENT_REQUEST_FIELDS: [&str; 4] =
        [SEND_ORDER_ID, PROVIDER_MESSAGE_ID, BILLING_SEQUENCE, SENT_AT];
}

/// Builds namespaced keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpace {
    namespace: String,
}

impl KeySpace {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn prefixed(&self, key: String) -> String {
        if self.namespace.is_empty() {
            key
        } else {
            format!("{}:{}", self.namespace, key)
        }
    }

    pub fn request(&self, tenant: &str, phone_number: &str) -> String {
        self.prefixed(format!("rq:{}:{}", tenant, phone_number))
    }

    pub fn response(&self, year_month: &str, tenant: &str, billing_sequence: &str) -> String {
        self.prefixed(format!("rs:{}:{}:{}", year_month, tenant, billing_sequence))
    }

    /// Token keys are the bare provider message id
    pub fn token(&self, provider_message_id: &str) -> String {
        provider_message_id.to_string()
    }

    pub fn request_audit_fallback(
        &self,
        year_month: &str,
        tenant: &str,
        billing_sequence: &str,
    ) -> String {
        self.prefixed(format!("logrq:{}:{}:{}", year_month, tenant, billing_sequence))
    }

    pub fn response_audit_fallback(
        &self,
        year_month: &str,
        tenant: &str,
        billing_sequence: &str,
    ) -> String {
        self.prefixed(format!("logrs:{}:{}:{}", year_month, tenant, billing_sequence))
    }

    pub fn send_order_counter(&self) -> String {
        self.prefixed(String::from("sq:global"))
    }

    pub fn billing_counter(&self, year_month: &str, tenant: &str) -> String {
        self.prefixed(format!("bil:{}:{}", year_month, tenant))
    }
}

impl Default for KeySpace {
    fn default() -> Self {
        Self::new("sms")
    }
}

/// Two-digit year and month bucket, e.g. `26:10`
pub fn year_month(at: DateTime<Utc>) -> String {
    at.format("%y:%m").to_string()
}

/// Timestamps are stored as RFC 3339 with second precision
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
