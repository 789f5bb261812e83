use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing::info;
use tracing_actix_web::TracingLogger;

use sms_api::app::{configure, AppState};
use sms_api::config::load_config;
use sms_api::telemetry::init_tracing;
use sms_core::domain::KeySpace;
use sms_core::repositories::KeyValueStore;
use sms_core::services::{
    AuditLogger, AuditSink, Clock, NoopAuditSink, ProviderRegistry, SystemClock,
    VerificationService,
};
use sms_infra::{create_providers, HttpAuditSink, RedisClient, RedisKeyValueStore};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().context("loading configuration")?;
    init_tracing(&config.logging);

    info!(
        address = %config.server.address(),
        provider = %config.sms.default_provider,
        "Starting SMS verification server"
    );

    let client = RedisClient::new(&config.redis)
        .await
        .context("connecting to Redis")?;
    let store: Arc<dyn KeyValueStore> = Arc::new(RedisKeyValueStore::new(client));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let keys = KeySpace::new(config.redis.key_namespace.clone());

    let providers = create_providers(&config.providers)?;
    let registry = Arc::new(ProviderRegistry::new(
        providers,
        &config.sms.default_provider,
        config.sms.admin_key.clone(),
    )?);
    if config.sms.admin_key.is_empty() {
        tracing::warn!("sms.admin_key is empty; provider switching is disabled");
    }

    let sink: Arc<dyn AuditSink> = if config.audit.enabled {
        Arc::new(HttpAuditSink::new(&config.audit)?)
    } else {
        info!("Audit delivery disabled");
        Arc::new(NoopAuditSink)
    };
    let (audit, audit_worker) =
        AuditLogger::spawn(sink, store.clone(), keys.clone(), config.audit.queue_capacity);

    let service = Arc::new(VerificationService::new(
        store,
        clock,
        keys,
        &config.sms,
        registry,
        audit,
    ));
    let state = web::Data::new(AppState::new(service));

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .shutdown_timeout(config.server.shutdown_timeout);
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(config.server.address())
        .with_context(|| format!("binding {}", config.server.address()))?
        .run()
        .await?;

    info!("Server stopped, draining audit queue");
    audit_worker.shutdown().await;
    Ok(())
}
