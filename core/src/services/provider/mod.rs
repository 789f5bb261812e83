//! Provider boundary: vendor send/verify calls behind one trait, and the
//! registry holding the active provider.

mod registry;

#[cfg(test)]
mod tests;

use async_trait::async_trait;

use crate::domain::entities::SmsResult;

pub use registry::ProviderRegistry;

/// A vendor able to send a verification SMS and check a submitted code
///
/// Implementations report every outcome, including transport failures,
/// through [`SmsResult`] and never panic on vendor input.
#[async_trait]
pub trait VerificationProvider: Send + Sync {
    fn provider_name(&self) -> &str;

    /// Ask the vendor to send a verification SMS
    ///
    /// On success `data` is the vendor message id. An empty id means the
    /// vendor acknowledged without sending.
    async fn send_verification(&self, phone_number: &str, content: &str, app_hash: &str) -> SmsResult;

    /// Check `received_code` for `phone_number`
    async fn verify(&self, phone_number: &str, sent_code: &str, received_code: &str) -> SmsResult;
}

/// Message for vendor error codes without a translation
pub fn support_message(code: i64) -> String {
    format!("Error {}. Please contact our support team.", code)
}
