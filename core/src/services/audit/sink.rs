use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::AuditEvent;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    #[error("audit sink unreachable: {0}")]
    Transport(String),

    #[error("audit sink answered with status {0}")]
    Status(u16),
}

/// Destination of audit events
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn deliver(&self, event: &AuditEvent) -> Result<(), AuditError>;
}

/// Sink that accepts and discards every event
///
/// Used when external audit delivery is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuditSink;

#[async_trait]
impl AuditSink for NoopAuditSink {
    async fn deliver(&self, event: &AuditEvent) -> Result<(), AuditError> {
        tracing::debug!(entity = event.entity(), "Audit delivery disabled, event discarded");
        Ok(())
    }
}
