//! Sinch verification API provider
//!
//! Sinch generates and checks the code itself: the send call starts a
//! verification for the number, the verify call submits the code the user
//! typed. Vendor error codes are translated into fixed user-facing messages.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use sms_core::domain::entities::SmsResult;
use sms_core::services::provider::{support_message, VerificationProvider};
use sms_shared::config::SinchConfig;
use sms_shared::utils::mask_phone_number;

use crate::errors::InfrastructureError;

pub const SINCH_PROVIDER_NAME: &str = "Sinch";

/// Unreadable vendor response
pub const PARSE_ERROR_CODE: i32 = 1;
/// Verification request could not be sent
pub const SEND_ERROR_CODE: i32 = 10;
/// Code verification failed
pub const VERIFY_ERROR_CODE: i32 = 20;

const SEND_SUCCESS_MESSAGE: &str = "Verification request sent successfully";
const VERIFY_SUCCESS_MESSAGE: &str = "Validated successfully";
const VERIFY_SUCCESS_STATUS: &str = "SUCCESSFUL";
const INVALID_CODE_ERROR: i64 = 40003;

#[derive(Debug, Serialize)]
struct Identity<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    endpoint: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SmsOptions<'a> {
    application_hash: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendRequest<'a> {
    identity: Identity<'a>,
    method: &'static str,
    sms_options: SmsOptions<'a>,
}

#[derive(Debug, Serialize)]
struct SubmittedCode<'a> {
    code: &'a str,
}

#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    method: &'static str,
    sms: SubmittedCode<'a>,
}

/// Union of the success and error shapes of a send response
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SendResponse {
    id: String,
    status: String,
    error_code: i64,
    message: String,
    reference: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct VerifyResponse {
    id: String,
    status: String,
    error_code: i64,
    message: String,
}

/// Message shown for a Sinch error code
pub fn translate_error(code: i64) -> String {
    let message = match code {
        40001 => "Invalid number",
        40002 => "Invalid parameter",
        40003 => "Invalid code",
        40004 => "Unauthorized",
        40005 => "Unrecognized format. Missing leading '+'",
        40100..=40108 => "Unauthorized",
        40200 => "The phone number cannot be verified right now. Please try again later.",
        40300..=40303 => "Invalid access",
        40400 => "Resource not found",
        40900 => "Request conflict",
        42200 => "Configuration error",
        42201 => "Unavailable",
        42202 => "Invalid callback response",
        42900 => "Capacity exceeded",
        42901 => "Velocity limit reached",
        50000 => "Internal error",
        50100 => "Method not implemented",
        50101 => "Status not implemented",
        50300 => "Service temporarily unavailable",
        50301 => "Configuration error",
        _ => return support_message(code),
    };
    message.to_string()
}

/// Interpret the body of a send call
///
/// Success is signalled by a verification id, whatever the HTTP status.
pub(crate) fn parse_send_response(body: &[u8]) -> SmsResult {
    let response: SendResponse = match serde_json::from_slice(body) {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Unreadable Sinch send response");
            return SmsResult::failure(PARSE_ERROR_CODE, format!("Unreadable provider response: {}", e), "");
        }
    };

    if !response.id.is_empty() {
        debug!(id = %response.id, status = %response.status, "Sinch accepted the verification request");
        return SmsResult::success(SEND_SUCCESS_MESSAGE, response.id);
    }

    debug!(
        error_code = response.error_code,
        vendor_message = %response.message,
        "Sinch rejected the verification request"
    );
    SmsResult::failure(
        SEND_ERROR_CODE,
        translate_error(response.error_code),
        format!("{} - {}", response.error_code, response.reference),
    )
}

/// Interpret the body of a verify call
pub(crate) fn parse_verify_response(body: &[u8]) -> SmsResult {
    let response: VerifyResponse = match serde_json::from_slice(body) {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Unreadable Sinch verify response");
            return SmsResult::failure(PARSE_ERROR_CODE, format!("Unreadable provider response: {}", e), "");
        }
    };

    if response.status == VERIFY_SUCCESS_STATUS {
        return SmsResult::success(VERIFY_SUCCESS_MESSAGE, "");
    }

    debug!(
        error_code = response.error_code,
        status = %response.status,
        vendor_message = %response.message,
        "Sinch rejected the code"
    );
    let message = if response.error_code == INVALID_CODE_ERROR {
        translate_error(response.error_code)
    } else {
        format!("{} ({})", translate_error(response.error_code), response.error_code)
    };
    SmsResult::failure(VERIFY_ERROR_CODE, message, response.id)
}

/// Sinch verification provider
pub struct SinchProvider {
    client: Client,
    config: SinchConfig,
}

impl SinchProvider {
    pub fn new(config: SinchConfig, timeout: Duration) -> Result<Self, InfrastructureError> {
        if config.auth_key.is_empty() {
            warn!("Sinch auth key is not configured; vendor calls will be rejected");
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }

    fn send_url(&self) -> String {
        format!("{}/verifications", self.config.base_url.trim_end_matches('/'))
    }

    fn verify_url(&self, phone_number: &str) -> String {
        format!(
            "{}/verifications/number/{}",
            self.config.base_url.trim_end_matches('/'),
            phone_number
        )
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("Authorization", format!("Basic {}", self.config.auth_key))
            .header("Accept-Language", self.config.language.as_str())
    }

    async fn call(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>, reqwest::Error> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            debug!(status = status.as_u16(), "Sinch answered with an error status");
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl VerificationProvider for SinchProvider {
    fn provider_name(&self) -> &str {
        SINCH_PROVIDER_NAME
    }

    async fn send_verification(&self, phone_number: &str, _content: &str, app_hash: &str) -> SmsResult {
        let phone = mask_phone_number(phone_number);

        // Numbers outside the served country are acknowledged without a send
        if !phone_number.starts_with(self.config.country_prefix.as_str()) {
            info!(phone = %phone, "Phone outside the served country, verification not sent");
            return SmsResult::success(SEND_SUCCESS_MESSAGE, "");
        }

        let body = SendRequest {
            identity: Identity {
                kind: "number",
                endpoint: phone_number,
            },
            method: "sms",
            sms_options: SmsOptions {
                application_hash: app_hash,
            },
        };
        let request = self.authorized(self.client.post(self.send_url()).json(&body));

        match self.call(request).await {
            Ok(body) => {
                let result = parse_send_response(&body);
                info!(
                    phone = %phone,
                    success = result.is_success,
                    code = result.code,
                    "Sinch send completed"
                );
                result
            }
            Err(e) => {
                error!(phone = %phone, error = %e, "Sinch send request failed");
                SmsResult::failure(SEND_ERROR_CODE, e.to_string(), "")
            }
        }
    }

    async fn verify(&self, phone_number: &str, _sent_code: &str, received_code: &str) -> SmsResult {
        let body = VerifyRequest {
            method: "sms",
            sms: SubmittedCode {
                code: received_code,
            },
        };
        let request = self.authorized(self.client.put(self.verify_url(phone_number)).json(&body));

        match self.call(request).await {
            Ok(body) => parse_verify_response(&body),
            Err(e) => {
                error!(
                    phone = %mask_phone_number(phone_number),
                    error = %e,
                    "Sinch verify request failed"
                );
                SmsResult::failure(VERIFY_ERROR_CODE, e.to_string(), "")
            }
        }
    }
}
