use std::sync::Arc;
use std::time::Duration;

use sms_shared::utils::mask_phone_number;

use crate::domain::entities::{BillingLink, RequestAudit, VerificationRequest, VerificationResponse};
use crate::domain::keys::{fields, format_timestamp, parse_timestamp, KeySpace};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::KeyValueStore;
use crate::services::audit::AuditLogger;
use crate::services::clock::Clock;
use crate::services::rate_limit::{Admission, RateLimiter};
use crate::services::sequence::SequenceGenerator;
use crate::services::token::{discard_transient_fields, TokenExchange};

/// Outcome of [`RequestStore::complete_send`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendCompletion {
    /// Billing allocated and provider message id stored
    Completed(VerificationRequest),
    /// The provider accepted the send but no billing sequence could be
    /// allocated; the request keeps no billing linkage
    Unbilled {
        request: VerificationRequest,
        reason: String,
    },
}

impl SendCompletion {
    pub fn request(&self) -> &VerificationRequest {
        match self {
            SendCompletion::Completed(request) => request,
            SendCompletion::Unbilled { request, .. } => request,
        }
    }
}

pub struct RequestStore {
    store: Arc<dyn KeyValueStore>,
    keys: KeySpace,
    clock: Arc<dyn Clock>,
    limiter: Arc<RateLimiter>,
    sequences: Arc<SequenceGenerator>,
    tokens: Arc<TokenExchange>,
    audit: AuditLogger,
    request_ttl: Duration,
}

impl RequestStore {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        keys: KeySpace,
        clock: Arc<dyn Clock>,
        limiter: Arc<RateLimiter>,
        sequences: Arc<SequenceGenerator>,
        tokens: Arc<TokenExchange>,
        audit: AuditLogger,
        request_ttl: Duration,
    ) -> Self {
        Self {
            store,
            keys,
            clock,
            limiter,
            sequences,
            tokens,
            audit,
            request_ttl,
        }
    }

    /// Admit and write a new request for (`tenant`, `phone_number`)
    ///
    /// A rejected admission is returned as `DomainError::RateLimit` and
    /// nothing is written. An admitted attempt first archives a sent but
    /// unverified predecessor.
    pub async fn create(&self, tenant: &str, phone_number: &str) -> DomainResult<VerificationRequest> {
        let key = self.keys.request(tenant, phone_number);

        match self.limiter.admit(&key).await? {
            Admission::Rejected { message } => {
                tracing::warn!(
                    tenant = tenant,
                    phone = %mask_phone_number(phone_number),
                    reason = %message,
                    event = "request_rate_limited",
                    "Verification request rejected"
                );
                return Err(DomainError::RateLimit { message });
            }
            Admission::Admitted { attempt } => {
                tracing::debug!(tenant = tenant, attempt = attempt, "Verification request admitted");
            }
        }

        // Only an admitted attempt may replace the in-flight request
        if let Err(e) = self.reconcile_abandoned(tenant, phone_number).await {
            tracing::warn!(
                tenant = tenant,
                phone = %mask_phone_number(phone_number),
                error = %e,
                "Could not archive abandoned request"
            );
        }

        match self
            .store
            .hash_increment(&key, fields::LIFETIME_TOTAL, 1)
            .await
        {
            Ok(total) => tracing::debug!(key = %key, total = total, "Lifetime request count"),
            Err(e) => tracing::warn!(key = %key, error = %e, "Failed to count request"),
        }

        let existing = self
            .store
            .hash_get(&key, &[fields::SEND_ORDER_ID])
            .await?
            .into_iter()
            .next()
            .flatten()
            .filter(|id| !id.is_empty());
        let send_order_id = match existing {
            Some(id) => id,
            None => self.sequences.next_send_order_id().await?,
        };

        let sent_at = self.clock.now();
        let stamp = format_timestamp(sent_at);
        self.store
            .hash_set(
                &key,
                &[
                    (fields::SEND_ORDER_ID, send_order_id.as_str()),
                    (fields::BILLING_SEQUENCE, ""),
                    (fields::PROVIDER_MESSAGE_ID, ""),
                    (fields::SENT_AT, stamp.as_str()),
                ],
            )
            .await
            .map_err(|e| DomainError::store_write(format!("Could not store the request: {}", e)))?;
        self.refresh_expiry(&key).await?;

        Ok(VerificationRequest {
            key,
            tenant: tenant.to_string(),
            phone_number: phone_number.to_string(),
            send_order_id,
            link: None,
            sent_at,
        })
    }

    /// Link `request` to the provider's message id after the provider accepted it
    ///
    /// A billing allocation failure does not fail the call: the message is
    /// already on its way, so the request is returned unbilled rather than
    /// triggering a resend.
    pub async fn complete_send(
        &self,
        request: VerificationRequest,
        provider_message_id: &str,
    ) -> DomainResult<SendCompletion> {
        let billing_sequence = match self.sequences.next_billing_sequence(&request.tenant).await {
            Ok(sequence) => {
                tracing::info!(
                    tenant = %request.tenant,
                    billing_sequence = %sequence.value,
                    event = "sms_billed",
                    "SMS accounted"
                );
                sequence
            }
            Err(e) => {
                tracing::error!(
                    tenant = %request.tenant,
                    error = %e,
                    event = "sms_billing_failed",
                    "SMS sent but billing sequence allocation failed"
                );
                return Ok(SendCompletion::Unbilled {
                    request,
                    reason: e.to_string(),
                });
            }
        };

        // Response and audit keys bucket by the send month, which must be the
        // month whose counter issued the sequence.
        let sent_at = billing_sequence.allocated_at;
        let billing_sequence = billing_sequence.value;
        let stamp = format_timestamp(sent_at);
        self.store
            .hash_set(
                &request.key,
                &[
                    (fields::SEND_ORDER_ID, request.send_order_id.as_str()),
                    (fields::BILLING_SEQUENCE, billing_sequence.as_str()),
                    (fields::PROVIDER_MESSAGE_ID, provider_message_id),
                    (fields::SENT_AT, stamp.as_str()),
                ],
            )
            .await
            .map_err(|e| DomainError::store_write(format!("Could not store the request: {}", e)))?;
        self.refresh_expiry(&request.key).await?;

        let completed = VerificationRequest {
            link: Some(BillingLink {
                billing_sequence,
                provider_message_id: provider_message_id.to_string(),
            }),
            sent_at,
            ..request
        };

        self.audit
            .log_request(RequestAudit {
                tenant: completed.tenant.clone(),
                phone_number: completed.phone_number.clone(),
                send_order_id: completed.send_order_id.clone(),
                billing_sequence: completed.billing_sequence().unwrap_or_default().to_string(),
                provider_message_id: provider_message_id.to_string(),
                sent_at,
            })
            .await;

        Ok(SendCompletion::Completed(completed))
    }

    /// Point lookup; a missing or already completed request reads as `None`
    pub async fn read(&self, tenant: &str, phone_number: &str) -> DomainResult<Option<VerificationRequest>> {
        let key = self.keys.request(tenant, phone_number);
        let values = self
            .store
            .hash_get(
                &key,
                &[
                    fields::SEND_ORDER_ID,
                    fields::BILLING_SEQUENCE,
                    fields::PROVIDER_MESSAGE_ID,
                    fields::SENT_AT,
                ],
            )
            .await?;
        let mut values = values.into_iter().map(Option::unwrap_or_default);
        let send_order_id = values.next().unwrap_or_default();
        let billing_sequence = values.next().unwrap_or_default();
        let provider_message_id = values.next().unwrap_or_default();
        let sent_at = values.next().unwrap_or_default();

        if send_order_id.is_empty() {
            return Ok(None);
        }

        let sent_at = parse_timestamp(&sent_at).ok_or_else(|| {
            DomainError::store_read(format!("Request {} has an unreadable send timestamp", key))
        })?;

        let link = match (billing_sequence.is_empty(), provider_message_id.is_empty()) {
            (false, false) => Some(BillingLink {
                billing_sequence,
                provider_message_id,
            }),
            (true, true) => None,
            _ => {
                tracing::warn!(key = %key, "Request has partial billing linkage, ignoring it");
                None
            }
        };

        Ok(Some(VerificationRequest {
            key,
            tenant: tenant.to_string(),
            phone_number: phone_number.to_string(),
            send_order_id,
            link,
            sent_at,
        }))
    }

    /// Archive a sent but never verified request before a new one replaces it
    ///
    /// Produces one failed response and clears the request's transient
    /// fields, so repeating the call is a no-op.
    pub async fn reconcile_abandoned(
        &self,
        tenant: &str,
        phone_number: &str,
    ) -> DomainResult<Option<VerificationResponse>> {
        let request = match self.read(tenant, phone_number).await? {
            Some(request) if request.is_sent() => request,
            _ => return Ok(None),
        };

        let response = self.tokens.record_failure(&request).await?;
        discard_transient_fields(self.store.as_ref(), &request.key).await?;
        Ok(Some(response))
    }

    async fn refresh_expiry(&self, key: &str) -> DomainResult<()> {
        self.store
            .expire(key, self.request_ttl)
            .await
            .map_err(|e| DomainError::store_write(format!("Could not store the request expiry: {}", e)))
    }
}
