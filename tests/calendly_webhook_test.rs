//! Calendly webhook endpoint tests.
//!
//! Drives `/webhooks/calendly` through the full router with both email
//! providers replaced by wiremock servers, covering the intro-call path, the
//! filtered-out path, provider fallback and payload rejection.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use calmprofile_notifier::api::create_router;
use calmprofile_notifier::mail::template::{BODY, FROM_ADDRESS, SUBJECT};
use calmprofile_notifier::mail::Dispatcher;
use calmprofile_notifier::security;
use calmprofile_notifier::{AppState, Config};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Providers {
    resend: MockServer,
    postmark: MockServer,
}

impl Providers {
    async fn start() -> Self {
        Self {
            resend: MockServer::start().await,
            postmark: MockServer::start().await,
        }
    }

    async fn resend_responds(&self, status: u16, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(header("authorization", "Bearer re_test"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({"id": "email-1"})))
            .expect(expected_calls)
            .mount(&self.resend)
            .await;
    }

    async fn postmark_responds(&self, status: u16, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/email"))
            .and(header("X-Postmark-Server-Token", "pm_test"))
            .respond_with(
                ResponseTemplate::new(status)
                    .set_body_json(json!({"ErrorCode": 0, "Message": "OK"})),
            )
            .expect(expected_calls)
            .mount(&self.postmark)
            .await;
    }

    fn config(&self, resend: bool, postmark: bool) -> Config {
        Config {
            resend_api_key: resend.then(|| "re_test".to_string()),
            resend_api_url: self.resend.uri(),
            postmark_server_token: postmark.then(|| "pm_test".to_string()),
            postmark_api_url: self.postmark.uri(),
            provider_timeout_seconds: 2,
            ..Config::default()
        }
    }
}

fn app(config: Config) -> Router {
    let dispatcher = Dispatcher::from_config(&config).expect("build dispatcher");
    create_router(AppState::new(config, dispatcher))
}

fn webhook_body(event_name: &str, email: &str) -> Value {
    json!({
        "event": "invitee.created",
        "payload": {
            "invitee": {"email": email, "name": "Test User"},
            "event_type": {"name": event_name, "slug": "intro"},
            "event": {
                "start_time": "2024-01-15T10:00:00.000000Z",
                "end_time": "2024-01-15T10:15:00.000000Z"
            }
        }
    })
}

async fn post_webhook(app: Router, body: Vec<u8>, signature: Option<String>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhooks/calendly")
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header(security::SIGNATURE_HEADER, signature);
    }
    let request = builder.body(Body::from(body)).expect("build request");

    let response = app.oneshot(request).await.expect("execute request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    let value = serde_json::from_slice(&bytes).expect("response should be JSON");
    (status, value)
}

#[tokio::test]
async fn intro_call_sends_email_via_primary() {
    let providers = Providers::start().await;
    providers.resend_responds(200, 1).await;
    providers.postmark_responds(200, 0).await;

    let body = serde_json::to_vec(&webhook_body("15-min intro call", "user@example.com")).unwrap();
    let (status, ack) = post_webhook(app(providers.config(true, true)), body, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        ack,
        json!({
            "received": true,
            "event_type": "invitee.created",
            "email_sent": true,
            "invitee_email": "user@example.com"
        })
    );
}

#[tokio::test]
async fn primary_request_carries_fixed_template() {
    let providers = Providers::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(body_partial_json(json!({
            "from": FROM_ADDRESS,
            "to": ["user@example.com"],
            "subject": SUBJECT,
            "text": BODY
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&providers.resend)
        .await;

    let body = serde_json::to_vec(&webhook_body("Intro 15 MIN", "user@example.com")).unwrap();
    let (status, ack) = post_webhook(app(providers.config(true, false)), body, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["email_sent"], json!(true));
}

#[tokio::test]
async fn non_intro_event_sends_nothing() {
    let providers = Providers::start().await;
    providers.resend_responds(200, 0).await;
    providers.postmark_responds(200, 0).await;

    let body = serde_json::to_vec(&webhook_body("30-min debrief", "user@example.com")).unwrap();
    let (status, ack) = post_webhook(app(providers.config(true, true)), body, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        ack,
        json!({"received": true, "event_type": "invitee.created", "email_sent": false})
    );
}

#[tokio::test]
async fn primary_failure_falls_back_to_postmark() {
    let providers = Providers::start().await;
    providers.resend_responds(503, 1).await;
    Mock::given(method("POST"))
        .and(path("/email"))
        .and(body_partial_json(json!({
            "To": "user@example.com",
            "Subject": SUBJECT,
            "TextBody": BODY,
            "MessageStream": "outbound"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ErrorCode": 0})))
        .expect(1)
        .mount(&providers.postmark)
        .await;

    let body = serde_json::to_vec(&webhook_body("15-min intro call", "user@example.com")).unwrap();
    let (status, ack) = post_webhook(app(providers.config(true, true)), body, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["email_sent"], json!(true));
}

#[tokio::test]
async fn primary_only_failure_never_tries_fallback() {
    let providers = Providers::start().await;
    providers.resend_responds(401, 1).await;
    providers.postmark_responds(200, 0).await;

    let body = serde_json::to_vec(&webhook_body("15-min intro call", "user@example.com")).unwrap();
    let (status, ack) = post_webhook(app(providers.config(true, false)), body, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["email_sent"], json!(false));
    assert_eq!(ack["invitee_email"], json!("user@example.com"));
}

#[tokio::test]
async fn both_providers_failing_still_acknowledges() {
    let providers = Providers::start().await;
    providers.resend_responds(500, 1).await;
    providers.postmark_responds(422, 1).await;

    let body = serde_json::to_vec(&webhook_body("15-min intro call", "user@example.com")).unwrap();
    let (status, ack) = post_webhook(app(providers.config(true, true)), body, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["received"], json!(true));
    assert_eq!(ack["email_sent"], json!(false));
}

#[tokio::test]
async fn postmark_error_code_counts_as_failure() {
    let providers = Providers::start().await;
    Mock::given(method("POST"))
        .and(path("/email"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ErrorCode": 406, "Message": "Inactive recipient"})),
        )
        .expect(1)
        .mount(&providers.postmark)
        .await;

    let body = serde_json::to_vec(&webhook_body("15-min intro call", "user@example.com")).unwrap();
    let (status, ack) = post_webhook(app(providers.config(false, true)), body, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["email_sent"], json!(false));
}

#[tokio::test]
async fn no_providers_configured_reports_not_sent() {
    let providers = Providers::start().await;

    let body = serde_json::to_vec(&webhook_body("15-min intro call", "user@example.com")).unwrap();
    let (status, ack) = post_webhook(app(providers.config(false, false)), body, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["email_sent"], json!(false));
}

#[tokio::test]
async fn missing_invitee_email_is_bad_request() {
    let providers = Providers::start().await;
    providers.resend_responds(200, 0).await;

    let body = serde_json::to_vec(&json!({
        "event": "invitee.created",
        "payload": {
            "invitee": {"name": "Test User"},
            "event_type": {"name": "15-min intro call", "slug": "intro"}
        }
    }))
    .unwrap();
    let (status, error) = post_webhook(app(providers.config(true, false)), body, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], json!(400));
    assert!(error["error"].as_str().unwrap().contains("invitee.email"));
}

#[tokio::test]
async fn non_json_body_is_bad_request() {
    let providers = Providers::start().await;

    let (status, error) =
        post_webhook(app(providers.config(false, false)), b"not json".to_vec(), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error.get("error").is_some());
}

#[tokio::test]
async fn signed_delivery_is_verified_when_key_configured() {
    let providers = Providers::start().await;
    providers.resend_responds(200, 1).await;

    let mut config = providers.config(true, false);
    config.calendly_signing_key = Some("calendly-secret".to_string());
    let app = app(config);

    let body = serde_json::to_vec(&webhook_body("15-min intro call", "user@example.com")).unwrap();
    let now = chrono::Utc::now().timestamp();
    let signature = format!("t={},v1={}", now, security::sign("calendly-secret", now, &body));

    let (status, ack) = post_webhook(app.clone(), body.clone(), Some(signature)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["email_sent"], json!(true));

    let (status, error) = post_webhook(app.clone(), body.clone(), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error["code"], json!(401));

    let forged = format!("t={},v1={}", now, security::sign("wrong-secret", now, &body));
    let (status, _) = post_webhook(app, body, Some(forged)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
