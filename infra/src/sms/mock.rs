//! Mock verification provider for development and testing
//!
//! Logs sends instead of delivering them and accepts one configured code.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use sms_core::domain::entities::SmsResult;
use sms_core::services::provider::VerificationProvider;
use sms_shared::config::MockProviderConfig;
use sms_shared::utils::mask_phone_number;

pub const MOCK_PROVIDER_NAME: &str = "Mock";

/// Code returned when the submitted code is not the accepted one
pub const INVALID_CODE_ERROR: i32 = 20;

#[derive(Clone)]
pub struct MockProvider {
    accepted_code: String,
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
}

impl MockProvider {
    pub fn new(config: &MockProviderConfig) -> Self {
        Self {
            accepted_code: config.accepted_code.clone(),
            message_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get the total number of messages sent
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(&MockProviderConfig::default())
    }
}

#[async_trait]
impl VerificationProvider for MockProvider {
    fn provider_name(&self) -> &str {
        MOCK_PROVIDER_NAME
    }

    async fn send_verification(&self, phone_number: &str, content: &str, app_hash: &str) -> SmsResult {
        let message_id = format!("mock_{}", Uuid::new_v4().simple());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        info!(
            target: "sms_service",
            provider = MOCK_PROVIDER_NAME,
            phone = %mask_phone_number(phone_number),
            message_id = %message_id,
            message_number = count,
            content_length = content.len(),
            app_hash = app_hash,
            "SMS sent successfully (mock)"
        );

        SmsResult::success("Verification request sent successfully", message_id)
    }

    async fn verify(&self, _phone_number: &str, _sent_code: &str, received_code: &str) -> SmsResult {
        if received_code == self.accepted_code {
            SmsResult::success("Validated successfully", "")
        } else {
            SmsResult::failure(INVALID_CODE_ERROR, "Invalid code", "")
        }
    }
}
