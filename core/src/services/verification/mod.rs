//! Verification use cases: send a code, verify it, resolve the token, and
//! switch the active provider.

mod service;
mod types;


pub use service::VerificationService;
pub use types::{SendCodeResult, SendCommand, VerifyCodeResult, VerifyCommand};
