//! Fixture wiring every service over an in-memory store and a manual clock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use sms_shared::config::{RateLimitConfig, SmsConfig};

use crate::domain::entities::AuditEvent;
use crate::domain::keys::KeySpace;
use crate::repositories::InMemoryKeyValueStore;
use crate::services::audit::{AuditError, AuditLogger, AuditSink, AuditWorker};
use crate::services::clock::ManualClock;
use crate::services::rate_limit::RateLimiter;
use crate::services::request::RequestStore;
use crate::services::sequence::SequenceGenerator;
use crate::services::token::TokenExchange;

pub(crate) const TENANT: &str = "X";
pub(crate) const PHONE: &str = "+5511999999999";

#[derive(Default)]
pub(crate) struct RecordingAuditSink {
    pub events: Mutex<Vec<AuditEvent>>,
}

impl RecordingAuditSink {
    pub fn entities(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|e| e.entity()).collect()
    }
}

#[async_trait]
impl AuditSink for RecordingAuditSink {
    async fn deliver(&self, event: &AuditEvent) -> Result<(), AuditError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

pub(crate) fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
}

pub(crate) struct Fixture {
    pub clock: Arc<ManualClock>,
    pub store: Arc<InMemoryKeyValueStore>,
    pub keys: KeySpace,
    pub limiter: Arc<RateLimiter>,
    pub sequences: Arc<SequenceGenerator>,
    pub tokens: Arc<TokenExchange>,
    pub requests: Arc<RequestStore>,
    pub audit: AuditLogger,
    pub audit_sink: Arc<RecordingAuditSink>,
    pub worker: AuditWorker,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_rate_limit(RateLimitConfig::default())
    }

    pub fn with_rate_limit(rate_limit: RateLimitConfig) -> Self {
        let sms = SmsConfig {
            rate_limit,
            ..SmsConfig::default()
        };
        let clock = Arc::new(ManualClock::new(start_time()));
        let store = Arc::new(InMemoryKeyValueStore::new(clock.clone()));
        let keys = KeySpace::default();
        let audit_sink = Arc::new(RecordingAuditSink::default());
        let (audit, worker) =
            AuditLogger::spawn(audit_sink.clone(), store.clone(), keys.clone(), 64);

        let limiter = Arc::new(RateLimiter::new(
            store.clone(),
            clock.clone(),
            sms.rate_limit.clone(),
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
            Duration::from_secs(sms.token_ttl_seconds),
        ));
        let requests = Arc::new(RequestStore::new(
            store.clone(),
            keys.clone(),
            clock.clone(),
            limiter.clone(),
            sequences.clone(),
            tokens.clone(),
            audit.clone(),
            Duration::from_secs(sms.request_ttl_seconds),
        ));

        Self {
            clock,
            store,
            keys,
            limiter,
            sequences,
            tokens,
            requests,
            audit,
            audit_sink,
            worker,
        }
    }

    pub fn request_key(&self) -> String {
        self.keys.request(TENANT, PHONE)
    }

    pub fn request_fields(&self) -> std::collections::HashMap<String, String> {
        self.store.hash_get_all(&self.request_key()).unwrap_or_default()
    }
}
