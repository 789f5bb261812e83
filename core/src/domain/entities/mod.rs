//! Domain entities stored in or exchanged through the key-value store.

pub mod audit;
pub mod request;
pub mod response;
pub mod sms_result;
pub mod token;

// Re-export commonly used types
pub use audit::{AuditEvent, RequestAudit, ResponseAudit};
pub use request::{BillingLink, VerificationRequest};
pub use response::VerificationResponse;
pub use sms_result::{SmsResult, SUCCESS_CODE};
pub use token::{TokenData, VerificationToken};
