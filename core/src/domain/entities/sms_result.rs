//! Outcome of a provider call.

use serde::{Deserialize, Serialize};

pub const SUCCESS_CODE: i32 = 0;

/// Structured provider outcome
///
/// `data` carries the provider message id on a successful send, or a vendor
/// error reference on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsResult {
    pub is_success: bool,
    pub code: i32,
    pub message: String,
    pub data: String,
}

impl SmsResult {
    pub fn success(message: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            is_success: true,
            code: SUCCESS_CODE,
            message: message.into(),
            data: data.into(),
        }
    }

    pub fn failure(code: i32, message: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            is_success: false,
            code,
            message: message.into(),
            data: data.into(),
        }
    }
}
