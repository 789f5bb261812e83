//! API response envelope

use serde::{Deserialize, Serialize};

use crate::errors::error_codes;

/// Envelope wrapping every outcome, success and failure alike
///
/// Failures are distinguished by `success` and `code`, never by HTTP status.
/// `data` is an opaque string: a provider message id, a JSON document or empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    pub code: i32,
    pub msg: String,
    pub data: String,
}

impl ResponseEnvelope {
    /// Successful envelope carrying `data`
    pub fn ok(data: impl Into<String>) -> Self {
        Self {
            success: true,
            code: error_codes::OK,
            msg: String::new(),
            data: data.into(),
        }
    }

    /// Successful envelope with a message and no data
    pub fn ok_with_message(msg: impl Into<String>) -> Self {
        Self {
            success: true,
            code: error_codes::OK,
            msg: msg.into(),
            data: String::new(),
        }
    }

    /// Failure envelope
    pub fn error(code: i32, msg: impl Into<String>) -> Self {
        Self {
            success: false,
            code,
            msg: msg.into(),
            data: String::new(),
        }
    }

    /// Attach opaque data (e.g. a vendor error reference)
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = data.into();
        self
    }
}
