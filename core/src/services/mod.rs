//! Business services of the verification lifecycle.

pub mod audit;
pub mod clock;
pub mod provider;
pub mod rate_limit;
pub mod request;
pub mod sequence;
pub mod token;
pub mod verification;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use audit::{AuditError, AuditLogger, AuditSink, AuditStats, AuditWorker, NoopAuditSink};
pub use clock::{Clock, ManualClock, SystemClock};
pub use provider::{ProviderRegistry, VerificationProvider};
pub use rate_limit::{Admission, RateLimiter};
pub use request::{RequestStore, SendCompletion};
pub use sequence::{BillingSequence, SequenceGenerator};
pub use token::TokenExchange;
pub use verification::{
    SendCodeResult, SendCommand, VerificationService, VerifyCodeResult, VerifyCommand,
};
