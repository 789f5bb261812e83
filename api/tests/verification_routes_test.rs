mod common;

use chrono::Duration;

use actix_web::http::{header, StatusCode};
use actix_web::{test, App};
use sms_api::app::configure;
use sms_shared::{error_codes, ResponseEnvelope};

use common::{send_body, verify_body, TestContext, CODE, PHONE, TENANT};

const SEND_URI: &str = "/api/sms/verification/send";
const VERIFY_URI: &str = "/api/sms/verification/verify";

#[actix_web::test]
async fn test_send_code_success() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().app_data(ctx.state.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri(SEND_URI)
        .set_json(send_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::PRAGMA).unwrap(), "no-cache");

    let envelope: ResponseEnvelope = test::read_body_json(resp).await;
    assert!(envelope.success);
    assert_eq!(envelope.code, error_codes::OK);
    assert_eq!(envelope.msg, "Verification request sent successfully");
    assert!(envelope.data.is_empty());

    let request = ctx
        .store
        .hash_get_all(&format!("sms:rq:{}:{}", TENANT, PHONE))
        .unwrap();
    assert!(request["si"].starts_with("mock_"));
}

#[actix_web::test]
async fn test_send_within_cooldown_is_rate_limited() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().app_data(ctx.state.clone()).configure(configure)).await;

    let first = test::TestRequest::post().uri(SEND_URI).set_json(send_body()).to_request();
    let envelope: ResponseEnvelope = test::call_and_read_body_json(&app, first).await;
    assert!(envelope.success);

    ctx.clock.advance(Duration::seconds(10));
    let second = test::TestRequest::post().uri(SEND_URI).set_json(send_body()).to_request();
    let resp = test::call_service(&app, second).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let envelope: ResponseEnvelope = test::read_body_json(resp).await;
    assert!(!envelope.success);
    assert_eq!(envelope.code, error_codes::RATE_LIMITED);
    assert_eq!(envelope.msg, "Too many requests. Try again shortly");
}

#[actix_web::test]
async fn test_send_rejects_missing_tenant() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().app_data(ctx.state.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri(SEND_URI)
        .set_json(serde_json::json!({ "phoneNumber": PHONE }))
        .to_request();
    let envelope: ResponseEnvelope = test::call_and_read_body_json(&app, req).await;

    assert!(!envelope.success);
    assert_eq!(envelope.code, error_codes::INVALID_INPUT);
    assert_eq!(envelope.data, "bandeira");
}

#[actix_web::test]
async fn test_send_rejects_non_e164_phone() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().app_data(ctx.state.clone()).configure(configure)).await;

    let mut body = send_body();
    body["phoneNumber"] = serde_json::json!("11999999999");
    let req = test::TestRequest::post().uri(SEND_URI).set_json(body).to_request();
    let envelope: ResponseEnvelope = test::call_and_read_body_json(&app, req).await;

    assert!(!envelope.success);
    assert_eq!(envelope.code, error_codes::INVALID_INPUT);
}

#[actix_web::test]
async fn test_malformed_json_answers_with_envelope() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().app_data(ctx.state.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri(SEND_URI)
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let envelope: ResponseEnvelope = test::read_body_json(resp).await;
    assert!(!envelope.success);
    assert_eq!(envelope.code, error_codes::INVALID_INPUT);
    assert!(!envelope.data.is_empty());
}

#[actix_web::test]
async fn test_verify_returns_provider_message_id() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().app_data(ctx.state.clone()).configure(configure)).await;

    let send = test::TestRequest::post().uri(SEND_URI).set_json(send_body()).to_request();
    let envelope: ResponseEnvelope = test::call_and_read_body_json(&app, send).await;
    assert!(envelope.success);

    let verify = test::TestRequest::post()
        .uri(VERIFY_URI)
        .set_json(verify_body(CODE))
        .to_request();
    let envelope: ResponseEnvelope = test::call_and_read_body_json(&app, verify).await;

    assert!(envelope.success);
    assert_eq!(envelope.msg, "Verified successfully");
    assert!(envelope.data.starts_with("mock_"));

    let token = ctx.store.hash_get_all(&envelope.data).unwrap();
    assert_eq!(token["pn"], PHONE);
    assert_eq!(token["vc"], CODE);
}

#[actix_web::test]
async fn test_verify_wrong_code_reports_provider_code() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().app_data(ctx.state.clone()).configure(configure)).await;

    let send = test::TestRequest::post().uri(SEND_URI).set_json(send_body()).to_request();
    let _: ResponseEnvelope = test::call_and_read_body_json(&app, send).await;

    let verify = test::TestRequest::post()
        .uri(VERIFY_URI)
        .set_json(verify_body("000000"))
        .to_request();
    let envelope: ResponseEnvelope = test::call_and_read_body_json(&app, verify).await;

    assert!(!envelope.success);
    assert_eq!(envelope.code, 20);
    assert_eq!(envelope.msg, "Invalid code");
}

#[actix_web::test]
async fn test_verify_without_request_is_not_found() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().app_data(ctx.state.clone()).configure(configure)).await;

    let verify = test::TestRequest::post()
        .uri(VERIFY_URI)
        .set_json(verify_body(CODE))
        .to_request();
    let envelope: ResponseEnvelope = test::call_and_read_body_json(&app, verify).await;

    assert!(!envelope.success);
    assert_eq!(envelope.code, error_codes::NOT_FOUND);
    assert_eq!(envelope.msg, "Request invalid or expired");
}

#[actix_web::test]
async fn test_health_follows_store() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().app_data(ctx.state.clone()).configure(configure)).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let envelope: ResponseEnvelope = test::call_and_read_body_json(&app, req).await;
    assert!(envelope.success);

    ctx.store.set_unavailable(true);
    let req = test::TestRequest::get().uri("/health").to_request();
    let envelope: ResponseEnvelope = test::call_and_read_body_json(&app, req).await;
    assert!(!envelope.success);
    assert_eq!(envelope.code, error_codes::STORE_READ);
}
