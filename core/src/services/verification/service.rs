//! Main verification service implementation

use std::sync::Arc;
use std::time::Duration;

use sms_shared::config::SmsConfig;
use sms_shared::utils::{is_valid_e164, mask_phone_number};

use crate::domain::entities::TokenData;
use crate::domain::keys::KeySpace;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::KeyValueStore;
use crate::services::audit::AuditLogger;
use crate::services::clock::Clock;
use crate::services::provider::ProviderRegistry;
use crate::services::rate_limit::RateLimiter;
use crate::services::request::{RequestStore, SendCompletion};
use crate::services::sequence::SequenceGenerator;
use crate::services::token::TokenExchange;

use super::types::{SendCodeResult, SendCommand, VerifyCodeResult, VerifyCommand};

pub const VERIFIED_MESSAGE: &str = "Verified successfully";
pub const REQUEST_NOT_FOUND_MESSAGE: &str = "Request invalid or expired";

const MAX_TENANT_LENGTH: usize = 64;
const MAX_CODE_LENGTH: usize = 16;

/// Orchestrates the send and verify flows over the lifecycle services
pub struct VerificationService {
    registry: Arc<ProviderRegistry>,
    requests: Arc<RequestStore>,
    tokens: Arc<TokenExchange>,
    store: Arc<dyn KeyValueStore>,
}

impl VerificationService {
    /// Wire the lifecycle services over `store`
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        keys: KeySpace,
        config: &SmsConfig,
        registry: Arc<ProviderRegistry>,
        audit: AuditLogger,
    ) -> Self {
        let limiter = Arc::new(RateLimiter::new(
            store.clone(),
            clock.clone(),
            config.rate_limit.clone(),
        ));
        let sequences = Arc::new(SequenceGenerator::new(
            store.clone(),
            keys.clone(),
            clock.clone(),
        ));
        let tokens = Arc::new(TokenExchange::new(
            store.clone(),
            keys.clone(),
            clock.clone(),
            limiter.clone(),
            audit.clone(),
            Duration::from_secs(config.token_ttl_seconds),
        ));
        let requests = Arc::new(RequestStore::new(
            store.clone(),
            keys,
            clock,
            limiter,
            sequences,
            tokens.clone(),
            audit,
            Duration::from_secs(config.request_ttl_seconds),
        ));

        Self {
            registry,
            requests,
            tokens,
            store,
        }
    }

    /// Send a verification SMS
    ///
    /// 1. Admits the attempt, archiving an abandoned earlier request for the
    ///    same phone, and writes the new request
    /// 2. Asks the active provider to send
    /// 3. Links the provider message id and billing sequence to the request
    pub async fn send(&self, command: SendCommand) -> DomainResult<SendCodeResult> {
        validate_tenant(&command.tenant)?;
        validate_phone(&command.phone_number)?;
        let phone = mask_phone_number(&command.phone_number);

        let request = self
            .requests
            .create(&command.tenant, &command.phone_number)
            .await?;

        let provider = self.registry.active();
        let result = provider
            .send_verification(&command.phone_number, &command.content, &command.app_hash)
            .await;

        if !result.is_success {
            tracing::warn!(
                tenant = %command.tenant,
                phone = %phone,
                provider = provider.provider_name(),
                code = result.code,
                reference = %result.data,
                event = "sms_send_failed",
                "Provider rejected the send"
            );
            return Err(DomainError::Provider {
                code: result.code,
                message: result.message,
                reference: result.data,
            });
        }

        if result.data.is_empty() {
            tracing::info!(
                tenant = %command.tenant,
                phone = %phone,
                provider = provider.provider_name(),
                event = "sms_send_acknowledged",
                "Provider acknowledged without sending"
            );
            return Ok(SendCodeResult {
                message: result.message,
                provider_message_id: None,
                billed: false,
            });
        }

        let billed = match self.requests.complete_send(request, &result.data).await? {
            SendCompletion::Completed(_) => true,
            SendCompletion::Unbilled { reason, .. } => {
                tracing::warn!(tenant = %command.tenant, reason = %reason, "Send completed without billing linkage");
                false
            }
        };

        tracing::info!(
            tenant = %command.tenant,
            phone = %phone,
            provider = provider.provider_name(),
            event = "sms_sent",
            "Verification SMS sent"
        );
        Ok(SendCodeResult {
            message: result.message,
            provider_message_id: Some(result.data),
            billed,
        })
    }

    /// Verify a submitted code and record the completed verification
    ///
    /// The server does not keep the code it sent, so the submitted code is
    /// passed to the provider as both the sent and the received code.
    pub async fn verify(&self, command: VerifyCommand) -> DomainResult<VerifyCodeResult> {
        validate_tenant(&command.tenant)?;
        validate_phone(&command.phone_number)?;
        validate_code(&command.validation_code)?;
        let phone = mask_phone_number(&command.phone_number);

        let provider = self.registry.active();
        let result = provider
            .verify(
                &command.phone_number,
                &command.validation_code,
                &command.validation_code,
            )
            .await;

        if !result.is_success {
            tracing::warn!(
                tenant = %command.tenant,
                phone = %phone,
                provider = provider.provider_name(),
                code = result.code,
                event = "verification_failed",
                "Provider rejected the code"
            );
            return Err(DomainError::Provider {
                code: result.code,
                message: result.message,
                reference: result.data,
            });
        }

        let request = self
            .requests
            .read(&command.tenant, &command.phone_number)
            .await?
            .filter(|r| r.is_sent())
            .ok_or_else(|| DomainError::not_found(REQUEST_NOT_FOUND_MESSAGE))?;

        let (response, token) = self
            .tokens
            .record_success(&request, &command.validation_code)
            .await?;

        tracing::info!(
            tenant = %command.tenant,
            phone = %phone,
            event = "verification_succeeded",
            "Phone verified"
        );
        Ok(VerifyCodeResult {
            message: VERIFIED_MESSAGE.to_string(),
            provider_message_id: token.key,
            response_key: response.key,
        })
    }

    /// Resolve a token to the confirmed phone number and code
    pub async fn find_token(&self, token: &str) -> DomainResult<TokenData> {
        let token = token.trim();
        if token.is_empty() {
            return Err(DomainError::validation("token is required"));
        }
        self.tokens.find_token(token).await?.ok_or(DomainError::Token)
    }

    pub fn active_provider(&self) -> String {
        self.registry.active_name()
    }

    /// Switch the active provider, authorized by the admin `key`
    pub fn change_provider(&self, name: &str, key: &str) -> DomainResult<String> {
        self.registry.activate(name, key)
    }

    /// Check that the store is reachable
    pub async fn health_check(&self) -> DomainResult<()> {
        self.store.ping().await
    }
}

fn validate_tenant(tenant: &str) -> DomainResult<()> {
    if tenant.is_empty()
        || tenant.len() > MAX_TENANT_LENGTH
        || tenant.chars().any(|c| c == ':' || c.is_whitespace())
    {
        return Err(DomainError::validation(format!("Invalid tenant: {:?}", tenant)));
    }
    Ok(())
}

fn validate_phone(phone_number: &str) -> DomainResult<()> {
    if !is_valid_e164(phone_number) {
        return Err(DomainError::validation(format!(
            "Invalid phone number format: {}",
            mask_phone_number(phone_number)
        )));
    }
    Ok(())
}

fn validate_code(code: &str) -> DomainResult<()> {
    if code.is_empty() || code.len() > MAX_CODE_LENGTH || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(DomainError::validation("Invalid validation code"));
    }
    Ok(())
}
