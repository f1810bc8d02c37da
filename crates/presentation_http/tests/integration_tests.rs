//! Integration tests for HTTP handlers
#![allow(clippy::expect_used)]

use std::{sync::Arc, time::Duration};

use application::{
    FALLBACK_REPLY, RelayService,
    error::ApplicationError,
    ports::{MessengerPort, QueryPort},
};
use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::DateTime;
use domain::{InboundEvent, OutboundReply};
use infrastructure::AppConfig;
use presentation_http::{routes::create_router, state::AppState};
use serde_json::json;
use tokio::sync::Mutex;

const VERIFY_TOKEN: &str = "verify-me";

/// Messenger that records every call
#[derive(Default)]
struct RecordingMessenger {
    typing: Mutex<Vec<String>>,
    replies: Mutex<Vec<OutboundReply>>,
}

#[async_trait]
impl MessengerPort for RecordingMessenger {
    async fn send_typing_indicator(&self, event: &InboundEvent) -> Result<(), ApplicationError> {
        self.typing.lock().await.push(event.sender_id.clone());
        Ok(())
    }

    async fn send_reply(&self, reply: &OutboundReply) -> Result<(), ApplicationError> {
        self.replies.lock().await.push(reply.clone());
        Ok(())
    }
}

/// Backend with a fixed outcome
struct ScriptedBackend {
    answer: Option<String>,
    queries: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            queries: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            answer: None,
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl QueryPort for ScriptedBackend {
    async fn query(&self, text: &str) -> Result<String, ApplicationError> {
        self.queries.lock().await.push(text.to_string());
        self.answer
            .clone()
            .ok_or_else(|| ApplicationError::ExternalService("backend down".to_string()))
    }
}

struct Harness {
    server: TestServer,
    messenger: Arc<RecordingMessenger>,
    backend: Arc<ScriptedBackend>,
}

fn harness(backend: ScriptedBackend) -> Harness {
    let messenger = Arc::new(RecordingMessenger::default());
    let backend = Arc::new(backend);

    let relay = RelayService::new(Arc::clone(&messenger) as _, Arc::clone(&backend) as _);

    let mut config = AppConfig::default();
    config.whatsapp.verify_token = Some(VERIFY_TOKEN.to_string());

    let router = create_router(AppState::new(relay, config));
    let server = TestServer::new(router).expect("Failed to create test server");

    Harness {
        server,
        messenger,
        backend,
    }
}

/// Wait until the detached reply flows have sent `count` replies
async fn wait_for_replies(messenger: &RecordingMessenger, count: usize) -> Vec<OutboundReply> {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            {
                let replies = messenger.replies.lock().await;
                if replies.len() >= count {
                    return replies.clone();
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("Timed out waiting for replies")
}

fn text_message(from: &str, id: &str, body: &str) -> serde_json::Value {
    json!({
        "from": from,
        "id": id,
        "timestamp": "1700000000",
        "type": "text",
        "text": {"body": body}
    })
}

fn webhook_payload(messages: Vec<serde_json::Value>) -> serde_json::Value {
    json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "id": "WABA_ID",
            "changes": [{
                "field": "messages",
                "value": {
                    "messaging_product": "whatsapp",
                    "metadata": {"phone_number_id": "5550001"},
                    "messages": messages
                }
            }]
        }]
    })
}

// ============ Verification Tests ============

#[tokio::test]
async fn verification_echoes_challenge() {
    let h = harness(ScriptedBackend::answering("unused"));

    let response = h
        .server
        .get("/")
        .add_query_param("hub.mode", "subscribe")
        .add_query_param("hub.verify_token", VERIFY_TOKEN)
        .add_query_param("hub.challenge", "1158201444")
        .await;

    response.assert_status_ok();
    assert_eq!(response.text(), "1158201444");
}

#[tokio::test]
async fn verification_rejects_wrong_token() {
    let h = harness(ScriptedBackend::answering("unused"));

    let response = h
        .server
        .get("/")
        .add_query_param("hub.mode", "subscribe")
        .add_query_param("hub.verify_token", "wrong")
        .add_query_param("hub.challenge", "1158201444")
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert!(response.text().is_empty());
}

#[tokio::test]
async fn verification_rejects_other_mode() {
    let h = harness(ScriptedBackend::answering("unused"));

    let response = h
        .server
        .get("/")
        .add_query_param("hub.mode", "unsubscribe")
        .add_query_param("hub.verify_token", VERIFY_TOKEN)
        .add_query_param("hub.challenge", "1158201444")
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn verification_with_repeated_mode_is_forbidden() {
    let h = harness(ScriptedBackend::answering("unused"));

    let response = h
        .server
        .get("/")
        .add_query_param("hub.mode", "subscribe")
        .add_query_param("hub.mode", "x")
        .add_query_param("hub.verify_token", VERIFY_TOKEN)
        .add_query_param("hub.challenge", "c")
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert!(response.text().is_empty());
}

#[tokio::test]
async fn verification_without_parameters_is_forbidden() {
    let h = harness(ScriptedBackend::answering("unused"));

    let response = h.server.get("/").await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn verification_without_configured_token_is_forbidden() {
    let messenger = Arc::new(RecordingMessenger::default());
    let backend = Arc::new(ScriptedBackend::answering("unused"));
    let relay = RelayService::new(messenger, backend);
    let server = TestServer::new(create_router(AppState::new(relay, AppConfig::default())))
        .expect("Failed to create test server");

    let response = server
        .get("/")
        .add_query_param("hub.mode", "subscribe")
        .add_query_param("hub.verify_token", "")
        .add_query_param("hub.challenge", "42")
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

// ============ Event Delivery Tests ============

#[tokio::test]
async fn single_message_is_relayed() {
    let h = harness(ScriptedBackend::answering("backend says hi"));

    let response = h
        .server
        .post("/")
        .json(&webhook_payload(vec![text_message("123", "wamid.1", "hello")]))
        .await;

    response.assert_status_ok();

    let replies = wait_for_replies(&h.messenger, 1).await;
    assert_eq!(replies, vec![OutboundReply::new("123", "backend says hi")]);
    assert_eq!(*h.messenger.typing.lock().await, vec!["123".to_string()]);
    assert_eq!(*h.backend.queries.lock().await, vec!["hello".to_string()]);
}

#[tokio::test]
async fn backend_failure_sends_fallback() {
    let h = harness(ScriptedBackend::failing());

    h.server
        .post("/")
        .json(&webhook_payload(vec![text_message("123", "wamid.1", "hello")]))
        .await
        .assert_status_ok();

    let replies = wait_for_replies(&h.messenger, 1).await;
    assert_eq!(replies[0].recipient_id, "123");
    assert_eq!(replies[0].text, FALLBACK_REPLY);
}

#[tokio::test]
async fn messages_in_one_delivery_are_processed_independently() {
    let h = harness(ScriptedBackend::answering("ok"));

    h.server
        .post("/")
        .json(&webhook_payload(vec![
            text_message("111", "wamid.1", "first"),
            text_message("222", "wamid.2", "second"),
        ]))
        .await
        .assert_status_ok();

    let replies = wait_for_replies(&h.messenger, 2).await;
    let mut recipients: Vec<_> = replies.iter().map(|r| r.recipient_id.as_str()).collect();
    recipients.sort_unstable();
    assert_eq!(recipients, vec!["111", "222"]);

    let mut queries = h.backend.queries.lock().await.clone();
    queries.sort();
    assert_eq!(queries, vec!["first".to_string(), "second".to_string()]);
}

#[tokio::test]
async fn non_text_message_queries_empty_string() {
    let h = harness(ScriptedBackend::answering("ok"));

    h.server
        .post("/")
        .json(&webhook_payload(vec![json!({
            "from": "123",
            "id": "wamid.img",
            "type": "image",
            "image": {"id": "media-1"}
        })]))
        .await
        .assert_status_ok();

    wait_for_replies(&h.messenger, 1).await;
    assert_eq!(*h.backend.queries.lock().await, vec![String::new()]);
}

#[tokio::test]
async fn other_object_is_acknowledged_and_ignored() {
    let h = harness(ScriptedBackend::answering("ok"));

    let mut payload = webhook_payload(vec![text_message("123", "wamid.1", "hello")]);
    payload["object"] = json!("page");

    h.server.post("/").json(&payload).await.assert_status_ok();

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(h.messenger.typing.lock().await.is_empty());
    assert!(h.messenger.replies.lock().await.is_empty());
    assert!(h.backend.queries.lock().await.is_empty());
}

#[tokio::test]
async fn status_update_is_acknowledged() {
    let h = harness(ScriptedBackend::answering("ok"));

    let response = h
        .server
        .post("/")
        .json(&json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "changes": [{
                    "field": "messages",
                    "value": {
                        "statuses": [{"id": "wamid.1", "status": "delivered"}]
                    }
                }]
            }]
        }))
        .await;

    response.assert_status_ok();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(h.backend.queries.lock().await.is_empty());
}

#[tokio::test]
async fn empty_body_is_acknowledged() {
    let h = harness(ScriptedBackend::answering("ok"));

    h.server.post("/").await.assert_status_ok();
}

#[tokio::test]
async fn invalid_json_is_internal_error() {
    let h = harness(ScriptedBackend::answering("ok"));

    let response = h.server.post("/").text("{not json").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "internal_error");
}

#[tokio::test]
async fn malformed_entry_is_internal_error() {
    let h = harness(ScriptedBackend::answering("ok"));

    let response = h
        .server
        .post("/")
        .json(&json!({
            "object": "whatsapp_business_account",
            "entry": "not-an-array"
        }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(h.backend.queries.lock().await.is_empty());
}

// ============ Health Endpoint Tests ============

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let h = harness(ScriptedBackend::answering("unused"));

    let response = h.server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "OK");
    let timestamp = body["timestamp"].as_str().expect("timestamp is a string");
    assert!(DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let h = harness(ScriptedBackend::answering("unused"));

    h.server.get("/nonexistent").await.assert_status_not_found();
}
