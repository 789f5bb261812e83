use serde::{Deserialize, Serialize};
use sms_core::services::verification::{SendCommand, VerifyCommand};
use validator::Validate;

/// Body of `POST /api/sms/verification/send`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct SendCodeRequest {
    /// E.164 phone number, e.g. "+5511999999999"
    #[validate(length(min = 8, max = 16))]
    pub phone_number: String,

    /// Application hash embedded in the SMS so the app can read it back
    #[validate(length(max = 64))]
    pub app_id: String,

    /// Tenant ("bandeira")
    #[validate(length(min = 1, max = 64))]
    pub bandeira: String,

    /// Message text for providers that send free text
    #[validate(length(max = 480))]
    pub content: String,
}

impl SendCodeRequest {
    pub fn into_command(self) -> SendCommand {
        SendCommand {
            tenant: self.bandeira.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            app_hash: self.app_id.trim().to_string(),
            content: self.content,
        }
    }
}

/// Body of `POST /api/sms/verification/verify`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifyCodeRequest {
    #[validate(length(min = 8, max = 16))]
    pub phone_number: String,

    #[validate(length(min = 1, max = 64))]
    pub bandeira: String,

    /// Accepted for compatibility with existing clients; not used
    pub app_id: String,

    #[validate(length(min = 1, max = 16))]
    pub validation_code: String,
}

impl VerifyCodeRequest {
    pub fn into_command(self) -> VerifyCommand {
        VerifyCommand {
            tenant: self.bandeira.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            validation_code: self.validation_code.trim().to_string(),
        }
    }
}
