//! Best-effort audit shipping.
//!
//! Events go through a bounded queue to a single background worker that
//! posts them to the audit sink. Whatever cannot be delivered (sink failure,
//! full or closed queue) is written to a fallback key in the store instead.
//! Callers never block on or fail because of audit delivery.

mod logger;
mod sink;


pub use logger::{AuditLogger, AuditStats, AuditWorker};
pub use sink::{AuditError, AuditSink, NoopAuditSink};
