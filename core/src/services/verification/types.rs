//! Commands and results of the verification use cases

/// Request to send a verification SMS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendCommand {
    pub tenant: String,
    pub phone_number: String,
    /// Application hash the SMS template carries so the app can read it
    pub app_hash: String,
    /// Free text some providers include in the message
    pub content: String,
}

/// Request to verify a submitted code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyCommand {
    pub tenant: String,
    pub phone_number: String,
    pub validation_code: String,
}

/// Result of a successful send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendCodeResult {
    /// Provider message shown to the caller
    pub message: String,
    /// Vendor message id, `None` when the vendor acknowledged without sending
    pub provider_message_id: Option<String>,
    /// False when billing allocation failed after the vendor accepted the send
    pub billed: bool,
}

/// Result of a successful verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyCodeResult {
    pub message: String,
    /// Token key for the downstream lookup
    pub provider_message_id: String,
    pub response_key: String,
}
