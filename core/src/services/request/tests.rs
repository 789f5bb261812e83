use std::time::Duration;

use chrono::Duration as ChronoDuration;

use crate::errors::DomainError;
use crate::services::testing::{Fixture, PHONE, TENANT};

use super::SendCompletion;

#[tokio::test]
async fn test_create_then_read_returns_same_record() {
    let fixture = Fixture::new();

    let created = fixture.requests.create(TENANT, PHONE).await.unwrap();
    let read = fixture.requests.read(TENANT, PHONE).await.unwrap().unwrap();

    assert_eq!(created.key, "sms:rq:X:+5511999999999");
    assert_eq!(read.send_order_id, created.send_order_id);
    assert_eq!(read.sent_at, created.sent_at);
    assert!(read.link.is_none());
}

#[tokio::test]
async fn test_complete_send_links_message_id_and_billing() {
    let fixture = Fixture::new();

    let created = fixture.requests.create(TENANT, PHONE).await.unwrap();
    let completion = fixture
        .requests
        .complete_send(created.clone(), "abc123")
        .await
        .unwrap();

    let completed = match completion {
        SendCompletion::Completed(request) => request,
        other => panic!("Expected completed send, got {:?}", other),
    };
    assert_eq!(completed.provider_message_id(), Some("abc123"));
    assert_eq!(completed.billing_sequence(), Some("1"));

    let read = fixture.requests.read(TENANT, PHONE).await.unwrap().unwrap();
    assert_eq!(read.send_order_id, created.send_order_id);
    assert_eq!(read.provider_message_id(), Some("abc123"));
    assert_eq!(fixture.store.counter("sms:bil:26:10:X"), Some(1));

    fixture.worker.shutdown().await;
    assert_eq!(fixture.audit_sink.entities(), vec!["historico_envio_sms"]);
}

#[tokio::test]
async fn test_create_refreshes_six_month_expiry() {
    let fixture = Fixture::new();

    fixture.requests.create(TENANT, PHONE).await.unwrap();

    assert_eq!(
        fixture.store.ttl(&fixture.request_key()),
        Some(Duration::from_secs(15_552_000))
    );
}

#[tokio::test]
async fn test_rejected_create_writes_nothing() {
    let fixture = Fixture::new();

    let first = fixture.requests.create(TENANT, PHONE).await.unwrap();
    let before = fixture.request_fields();

    let second = fixture.requests.create(TENANT, PHONE).await;

    assert!(matches!(second, Err(DomainError::RateLimit { .. })));
    assert_eq!(fixture.request_fields(), before);
    assert_eq!(before.get("idp"), Some(&first.send_order_id));
    assert_eq!(before.get("total").map(String::as_str), Some("1"));
}

#[tokio::test]
async fn test_unsent_request_keeps_its_send_order_id() {
    let fixture = Fixture::new();

    let first = fixture.requests.create(TENANT, PHONE).await.unwrap();
    fixture.clock.advance(ChronoDuration::seconds(45));
    let second = fixture.requests.create(TENANT, PHONE).await.unwrap();

    assert_eq!(second.send_order_id, first.send_order_id);
    assert_eq!(
        fixture.request_fields().get("total").map(String::as_str),
        Some("2")
    );
}

#[tokio::test]
async fn test_billing_failure_returns_unbilled_request() {
    let fixture = Fixture::new();
    fixture.store.fail_keys_with_prefix("sms:bil:");

    let created = fixture.requests.create(TENANT, PHONE).await.unwrap();
    let completion = fixture
        .requests
        .complete_send(created, "abc123")
        .await
        .unwrap();

    assert!(matches!(completion, SendCompletion::Unbilled { .. }));
    assert!(completion.request().link.is_none());

    let read = fixture.requests.read(TENANT, PHONE).await.unwrap().unwrap();
    assert!(read.link.is_none());
}

#[tokio::test]
async fn test_read_missing_request_is_none() {
    let fixture = Fixture::new();

    assert!(fixture.requests.read(TENANT, PHONE).await.unwrap().is_none());
}

#[tokio::test]
async fn test_reconcile_archives_sent_request_once() {
    let fixture = Fixture::new();

    let created = fixture.requests.create(TENANT, PHONE).await.unwrap();
    fixture
        .requests
        .complete_send(created.clone(), "abc123")
        .await
        .unwrap();

    let archived = fixture
        .requests
        .reconcile_abandoned(TENANT, PHONE)
        .await
        .unwrap()
        .unwrap();

    assert!(!archived.is_success());
    assert_eq!(archived.key, "sms:rs:26:10:X:1");
    let response = fixture.store.hash_get_all(&archived.key).unwrap();
    assert_eq!(response.get("idp"), Some(&created.send_order_id));
    assert_eq!(response.get("pn").map(String::as_str), Some(PHONE));
    assert_eq!(response.get("si").map(String::as_str), Some("abc123"));
    assert!(response.contains_key("tsnd"));
    assert!(!response.contains_key("vc"));

    // Transient fields cleared, attempt tracking kept
    let request = fixture.request_fields();
    for field in ["idp", "si", "sq", "tsnd"] {
        assert!(!request.contains_key(field), "{} should be cleared", field);
    }
    assert_eq!(request.get("tc").map(String::as_str), Some("1"));

    assert!(fixture
        .requests
        .reconcile_abandoned(TENANT, PHONE)
        .await
        .unwrap()
        .is_none());
    assert_eq!(fixture.store.keys_with_prefix("sms:rs:").len(), 1);
}

#[tokio::test]
async fn test_reconcile_then_create_allocates_new_send_order_id() {
    let fixture = Fixture::new();

    let first = fixture.requests.create(TENANT, PHONE).await.unwrap();
    fixture.requests.complete_send(first.clone(), "abc123").await.unwrap();
    fixture.clock.advance(ChronoDuration::seconds(60));

    fixture.requests.reconcile_abandoned(TENANT, PHONE).await.unwrap();
    let second = fixture.requests.create(TENANT, PHONE).await.unwrap();

    assert_ne!(second.send_order_id, first.send_order_id);
}

#[tokio::test]
async fn test_reconcile_ignores_unsent_request() {
    let fixture = Fixture::new();

    fixture.requests.create(TENANT, PHONE).await.unwrap();

    assert!(fixture
        .requests
        .reconcile_abandoned(TENANT, PHONE)
        .await
        .unwrap()
        .is_none());
    assert!(fixture.store.keys_with_prefix("sms:rs:").is_empty());
}

#[tokio::test]
async fn test_create_store_failure_is_a_store_error() {
    let fixture = Fixture::new();
    fixture.store.fail_keys_with_prefix("sms:rq:");

    let result = fixture.requests.create(TENANT, PHONE).await;

    assert!(result.unwrap_err().is_store_failure());
}

#[tokio::test]
async fn test_admitted_create_archives_sent_predecessor() {
    let fixture = Fixture::new();

    let first = fixture.requests.create(TENANT, PHONE).await.unwrap();
    fixture.requests.complete_send(first, "abc123").await.unwrap();
    fixture.clock.advance(ChronoDuration::seconds(45));

    fixture.requests.create(TENANT, PHONE).await.unwrap();

    assert_eq!(fixture.store.keys_with_prefix("sms:rs:").len(), 1);
    assert_eq!(
        fixture.request_fields().get("si").map(String::as_str),
        Some("")
    );
}

#[tokio::test]
async fn test_rejected_create_leaves_sent_request_verifiable() {
    let fixture = Fixture::new();

    let first = fixture.requests.create(TENANT, PHONE).await.unwrap();
    fixture.requests.complete_send(first, "abc123").await.unwrap();

    let second = fixture.requests.create(TENANT, PHONE).await;

    assert!(matches!(second, Err(DomainError::RateLimit { .. })));
    assert!(fixture.store.keys_with_prefix("sms:rs:").is_empty());
    let request = fixture.requests.read(TENANT, PHONE).await.unwrap().unwrap();
    assert_eq!(request.provider_message_id(), Some("abc123"));
}
