//! Integration tests for the Redis-backed key-value store
//!
//! Tests marked `#[ignore]` require a running Redis instance at `REDIS_URL`
//! (default `redis://127.0.0.1:6379`).

use std::time::Duration;

use sms_core::repositories::KeyValueStore;
use sms_infra::cache::{RedisClient, RedisConfig, RedisKeyValueStore};

fn unique_key(name: &str) -> String {
    format!("sms-test:{}:{}", name, uuid::Uuid::new_v4())
}

async fn store() -> RedisKeyValueStore {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
    let client = RedisClient::new(&RedisConfig::new(url))
        .await
        .expect("Failed to connect to Redis");
    RedisKeyValueStore::new(client)
}

#[tokio::test]
#[ignore] // Requires Redis to be running
async fn test_hash_roundtrip_and_delete() {
    let store = store().await;
    let key = unique_key("hash");

    store
        .hash_set(&key, &[("idp", "7"), ("si", "abc123")])
        .await
        .unwrap();
    let values = store.hash_get(&key, &["idp", "si", "sq"]).await.unwrap();
    assert_eq!(
        values,
        vec![Some("7".to_string()), Some("abc123".to_string()), None]
    );

    store.hash_delete(&key, &["idp", "si"]).await.unwrap();
    let values = store.hash_get(&key, &["idp", "si"]).await.unwrap();
    assert_eq!(values, vec![None, None]);
}

#[tokio::test]
#[ignore] // Requires Redis to be running
async fn test_counters_are_monotonic() {
    let store = store().await;
    let key = unique_key("counter");
    let hash = unique_key("hash-counter");

    assert_eq!(store.increment(&key).await.unwrap(), 1);
    assert_eq!(store.increment(&key).await.unwrap(), 2);
    assert_eq!(store.hash_increment(&hash, "tc", 1).await.unwrap(), 1);
    assert_eq!(store.hash_increment(&hash, "tc", 1).await.unwrap(), 2);

    store.expire(&key, Duration::from_secs(5)).await.unwrap();
    store.expire(&hash, Duration::from_secs(5)).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis to be running
async fn test_hash_with_expiry_disappears() {
    let store = store().await;
    let key = unique_key("token");

    store
        .hash_set_with_expiry(
            &key,
            &[("pn", "+5511999999999"), ("vc", "4821")],
            Duration::from_secs(1),
        )
        .await
        .unwrap();
    assert_eq!(
        store.hash_get(&key, &["vc"]).await.unwrap(),
        vec![Some("4821".to_string())]
    );

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(store.hash_get(&key, &["vc"]).await.unwrap(), vec![None]);
}

#[tokio::test]
#[ignore] // Requires Redis to be running
async fn test_ping() {
    let store = store().await;
    assert!(store.ping().await.is_ok());
}

#[tokio::test]
async fn test_unreachable_redis_fails_to_connect() {
    let config = RedisConfig {
        url: "redis://127.0.0.1:1".to_string(),
        max_retries: 1,
        connection_timeout: 1,
        ..RedisConfig::default()
    };

    assert!(RedisClient::new(&config).await.is_err());
}

#[tokio::test]
async fn test_invalid_url_is_a_config_error() {
    let result = RedisClient::new(&RedisConfig::new("not a url")).await;
    assert!(matches!(
        result,
        Err(sms_infra::InfrastructureError::Config(_))
    ));
}
