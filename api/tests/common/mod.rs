#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use chrono::{TimeZone, Utc};
use sms_api::app::AppState;
use sms_core::domain::KeySpace;
use sms_core::repositories::InMemoryKeyValueStore;
use sms_core::services::{
    AuditLogger, AuditWorker, ManualClock, NoopAuditSink, ProviderRegistry, VerificationService,
};
use sms_infra::create_providers;
use sms_shared::config::{ProvidersConfig, SmsConfig};

pub const TENANT: &str = "X";
pub const PHONE: &str = "+5511999999999";
pub const ADMIN_KEY: &str = "admin-secret";
pub const CODE: &str = "123456";

/// Service wired over an in-memory store with the mock provider active
pub struct TestContext {
    pub clock: Arc<ManualClock>,
    pub store: Arc<InMemoryKeyValueStore>,
    pub state: web::Data<AppState>,
    pub worker: AuditWorker,
}

impl TestContext {
    /// Must run inside the test runtime; the audit worker is spawned on it
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap(),
        ));
        let store = Arc::new(InMemoryKeyValueStore::new(clock.clone()));
        let keys = KeySpace::default();

        let sms = SmsConfig {
            default_provider: "Mock".to_string(),
            admin_key: ADMIN_KEY.to_string(),
            ..SmsConfig::default()
        };
        let providers = create_providers(&ProvidersConfig::default()).unwrap();
        let registry = Arc::new(
            ProviderRegistry::new(providers, &sms.default_provider, sms.admin_key.clone())
                .unwrap(),
        );

        let (audit, worker) =
            AuditLogger::spawn(Arc::new(NoopAuditSink), store.clone(), keys.clone(), 16);
        let service = Arc::new(VerificationService::new(
            store.clone(),
            clock.clone(),
            keys,
            &sms,
            registry,
            audit,
        ));

        Self {
            clock,
            store,
            state: web::Data::new(AppState::new(service)),
            worker,
        }
    }
}

pub fn send_body() -> serde_json::Value {
    serde_json::json!({
        "phoneNumber": PHONE,
        "appId": "FA+9qCX9VSu",
        "bandeira": TENANT,
        "content": ""
    })
}

pub fn verify_body(code: &str) -> serde_json::Value {
    serde_json::json!({
        "phoneNumber": PHONE,
        "bandeira": TENANT,
        "appId": "FA+9qCX9VSu",
        "validationCode": code
    })
}
