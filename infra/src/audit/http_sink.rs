//! HTTP audit sink
//!
//! Posts each event as a JSON array of `{entity, content}` envelopes to the
//! log service. Any transport error or non-2xx status is reported back so
//! the audit worker can keep the event locally.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use sms_core::domain::entities::AuditEvent;
use sms_core::services::audit::{AuditError, AuditSink};
use sms_shared::config::AuditConfig;

use crate::errors::InfrastructureError;

pub struct HttpAuditSink {
    client: Client,
    url: String,
}

impl HttpAuditSink {
    pub fn new(config: &AuditConfig) -> Result<Self, InfrastructureError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            url: config.save_url(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AuditSink for HttpAuditSink {
    async fn deliver(&self, event: &AuditEvent) -> Result<(), AuditError> {
        let response = self
            .client
            .post(&self.url)
            .json(&event.to_payload())
            .send()
            .await
            .map_err(|e| AuditError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuditError::Status(status.as_u16()));
        }

        debug!(
            entity = event.entity(),
            tenant = event.tenant(),
            billing_sequence = event.billing_sequence(),
            "Audit event delivered"
        );
        Ok(())
    }
}
