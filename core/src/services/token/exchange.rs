use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::{
    ResponseAudit, TokenData, VerificationRequest, VerificationResponse, VerificationToken,
};
use crate::domain::keys::{fields, format_timestamp, year_month, KeySpace};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::KeyValueStore;
use crate::services::audit::AuditLogger;
use crate::services::clock::Clock;
use crate::services::rate_limit::RateLimiter;

use sms_shared::utils::mask_phone_number;

/// Records completed verifications and resolves tokens
///
/// Tokens stay readable until their TTL elapses; a lookup does not consume them.
pub struct TokenExchange {
    store: Arc<dyn KeyValueStore>,
    keys: KeySpace,
    clock: Arc<dyn Clock>,
    limiter: Arc<RateLimiter>,
    audit: AuditLogger,
    token_ttl: Duration,
}

impl TokenExchange {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        keys: KeySpace,
        clock: Arc<dyn Clock>,
        limiter: Arc<RateLimiter>,
        audit: AuditLogger,
        token_ttl: Duration,
    ) -> Self {
        Self {
            store,
            keys,
            clock,
            limiter,
            audit,
            token_ttl,
        }
    }

    /// Record a successful verification of `request` with `submitted_code`
    ///
    /// Writes the response, clears the attempt counters, mints the token and
    /// finally drops the request's transient fields, which now live in the
    /// response.
    pub async fn record_success(
        &self,
        request: &VerificationRequest,
        submitted_code: &str,
    ) -> DomainResult<(VerificationResponse, VerificationToken)> {
        let response = self.write_response(request, Some(submitted_code)).await?;

        if let Err(e) = self.limiter.reset(&request.key).await {
            tracing::warn!(key = %request.key, error = %e, "Failed to reset attempt counter");
        }

        let token = self
            .mint_token(&response.provider_message_id, &request.phone_number, submitted_code)
            .await?;

        if let Err(e) = discard_transient_fields(self.store.as_ref(), &request.key).await {
            tracing::warn!(key = %request.key, error = %e, "Failed to discard transient request fields");
        }

        tracing::info!(
            tenant = %request.tenant,
            phone = %mask_phone_number(&request.phone_number),
            response_key = %response.key,
            event = "verification_recorded",
            "Verification recorded"
        );
        Ok((response, token))
    }

    /// Archive `request` as a failed verification
    ///
    /// Leaves the attempt counters and the request's transient fields alone;
    /// callers clear the transient fields themselves.
    pub async fn record_failure(
        &self,
        request: &VerificationRequest,
    ) -> DomainResult<VerificationResponse> {
        let response = self.write_response(request, None).await?;
        self.mint_token(&response.provider_message_id, &request.phone_number, "")
            .await?;

        tracing::info!(
            tenant = %request.tenant,
            phone = %mask_phone_number(&request.phone_number),
            response_key = %response.key,
            event = "abandoned_request_archived",
            "Abandoned request archived as failed verification"
        );
        Ok(response)
    }

    /// Resolve a token; unknown, expired or code-less tokens read as `None`
    pub async fn find_token(&self, provider_message_id: &str) -> DomainResult<Option<TokenData>> {
        let values = self
            .store
            .hash_get(
                &self.keys.token(provider_message_id),
                &[fields::PHONE_NUMBER, fields::VALIDATION_CODE],
            )
            .await?;

        let mut values = values.into_iter().map(Option::unwrap_or_default);
        let phone_number = values.next().unwrap_or_default();
        let validation_code = values.next().unwrap_or_default();

        if phone_number.is_empty() || validation_code.is_empty() {
            return Ok(None);
        }
        Ok(Some(TokenData {
            phone_number,
            validation_code,
        }))
    }

    async fn write_response(
        &self,
        request: &VerificationRequest,
        code: Option<&str>,
    ) -> DomainResult<VerificationResponse> {
        let link = request
            .link
            .as_ref()
            .ok_or_else(|| DomainError::not_found("request invalid or expired"))?;

        // The billing sequence is unique only within the month it was issued in
        let now = self.clock.now();
        let key = self.keys.response(
            &year_month(request.sent_at),
            &request.tenant,
            &link.billing_sequence,
        );
        let sent_at = format_timestamp(request.sent_at);
        let received_at = format_timestamp(now);

        let mut values = vec![
            (fields::SEND_ORDER_ID, request.send_order_id.as_str()),
            (fields::PHONE_NUMBER, request.phone_number.as_str()),
            (fields::PROVIDER_MESSAGE_ID, link.provider_message_id.as_str()),
            (fields::SENT_AT, sent_at.as_str()),
        ];
        if let Some(code) = code {
            values.push((fields::VALIDATION_CODE, code));
            values.push((fields::RECEIVED_AT, received_at.as_str()));
        }

        self.store.hash_set(&key, &values).await.map_err(|e| {
            tracing::error!(key = %key, error = %e, "Failed to write verification response");
            DomainError::store_write(format!("Could not record the verification: {}", e))
        })?;

        let response = VerificationResponse {
            key,
            tenant: request.tenant.clone(),
            phone_number: request.phone_number.clone(),
            send_order_id: request.send_order_id.clone(),
            billing_sequence: link.billing_sequence.clone(),
            provider_message_id: link.provider_message_id.clone(),
            validation_code: code.map(str::to_string),
            sent_at: request.sent_at,
            received_at: code.map(|_| now),
        };

        self.audit
            .log_response(ResponseAudit {
                tenant: response.tenant.clone(),
                send_order_id: response.send_order_id.clone(),
                billing_sequence: response.billing_sequence.clone(),
                validation_code: response.validation_code.clone(),
                sent_at: response.sent_at,
                received_at: response.received_at,
            })
            .await;

        Ok(response)
    }

    async fn mint_token(
        &self,
        provider_message_id: &str,
        phone_number: &str,
        code: &str,
    ) -> DomainResult<VerificationToken> {
        let key = self.keys.token(provider_message_id);
        self.store
            .hash_set_with_expiry(
                &key,
                &[
                    (fields::PHONE_NUMBER, phone_number),
                    (fields::VALIDATION_CODE, code),
                ],
                self.token_ttl,
            )
            .await
            .map_err(|e| DomainError::store_write(format!("Could not generate the token: {}", e)))?;

        let ttl = chrono::Duration::from_std(self.token_ttl).unwrap_or_else(|_| chrono::Duration::zero());
        Ok(VerificationToken {
            key,
            data: TokenData {
                phone_number: phone_number.to_string(),
                validation_code: code.to_string(),
            },
            expires_at: self.clock.now() + ttl,
        })
    }
}

/// Delete the transient fields of a request in one pipelined batch
pub(crate) async fn discard_transient_fields(
    store: &dyn KeyValueStore,
    request_key: &str,
) -> DomainResult<()> {
    store
        .hash_delete(request_key, &fields::TRANSIENT_REQUEST_FIELDS)
        .await
}
