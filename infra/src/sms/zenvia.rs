//! Zenvia messaging API provider
//!
//! Zenvia only delivers the text; the caller composes the code into the
//! message content and verification is a local comparison.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use sms_core::domain::entities::SmsResult;
use sms_core::services::provider::VerificationProvider;
use sms_shared::config::ZenviaConfig;
use sms_shared::utils::mask_phone_number;

use crate::errors::InfrastructureError;

pub const ZENVIA_PROVIDER_NAME: &str = "Zenvia";

/// Submitted code differs from the sent one
pub const INVALID_CODE_ERROR: i32 = 1;
/// SMS could not be sent
pub const SEND_ERROR_CODE: i32 = 11;

#[derive(Debug, Serialize)]
struct TextContent<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct MessageRequest<'a> {
    from: &'a str,
    to: &'a str,
    contents: Vec<TextContent<'a>>,
}

/// Union of the success and error shapes of a message response
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MessageResponse {
    id: String,
    code: String,
    message: String,
}

/// Interpret the answer to a message request
pub(crate) fn parse_message_response(status: u16, body: &[u8]) -> SmsResult {
    let response: MessageResponse = serde_json::from_slice(body).unwrap_or_default();

    if (200..300).contains(&status) && !response.id.is_empty() {
        return SmsResult::success("SMS sent successfully", response.id);
    }

    let message = if response.message.is_empty() {
        format!("SMS could not be sent (HTTP {})", status)
    } else {
        response.message
    };
    let reference = if response.code.is_empty() {
        status.to_string()
    } else {
        response.code
    };
    SmsResult::failure(SEND_ERROR_CODE, message, reference)
}

pub struct ZenviaProvider {
    client: Client,
    config: ZenviaConfig,
}

impl ZenviaProvider {
    pub fn new(config: ZenviaConfig, timeout: Duration) -> Result<Self, InfrastructureError> {
        if config.api_token.is_empty() {
            warn!("Zenvia API token is not configured; vendor calls will be rejected");
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl VerificationProvider for ZenviaProvider {
    fn provider_name(&self) -> &str {
        ZENVIA_PROVIDER_NAME
    }

    async fn send_verification(&self, phone_number: &str, content: &str, app_hash: &str) -> SmsResult {
        let phone = mask_phone_number(phone_number);
        let body = MessageRequest {
            from: &self.config.from,
            to: phone_number,
            contents: vec![
                TextContent {
                    kind: "text",
                    text: content,
                },
                TextContent {
                    kind: "text",
                    text: app_hash,
                },
            ],
        };

        let response = self
            .client
            .post(&self.config.url)
            .header("X-API-TOKEN", self.config.api_token.as_str())
            .json(&body)
            .send()
            .await;

        let outcome = match response {
            Ok(response) => {
                let status = response.status().as_u16();
                response.bytes().await.map(|body| (status, body))
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok((status, body)) => {
                let result = parse_message_response(status, &body);
                info!(
                    phone = %phone,
                    success = result.is_success,
                    status = status,
                    "Zenvia send completed"
                );
                result
            }
            Err(e) => {
                error!(phone = %phone, error = %e, "Zenvia send request failed");
                SmsResult::failure(SEND_ERROR_CODE, e.to_string(), "")
            }
        }
    }

    async fn verify(&self, _phone_number: &str, sent_code: &str, received_code: &str) -> SmsResult {
        if sent_code != received_code {
            return SmsResult::failure(INVALID_CODE_ERROR, "Invalid code", "");
        }
        SmsResult::success("Validated successfully", "")
    }
}
