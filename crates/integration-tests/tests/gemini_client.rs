//! Integration tests for the Gemini client against a local stand-in API.

#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use campaign_dashboard::gemini::{GeminiClient, ProviderError};
use campaign_dashboard_integration_tests::{TestApp, test_config};

/// What the stand-in API saw on its last call.
#[derive(Default)]
struct Seen {
    model: Option<String>,
    api_key: Option<String>,
    body: Option<Value>,
}

#[derive(Clone)]
struct Stub {
    reply: fn() -> Response,
    seen: Arc<Mutex<Seen>>,
}

async fn generate(
    State(stub): State<Stub>,
    Path(model_action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut seen = stub.seen.lock().unwrap();
    seen.model = model_action.strip_suffix(":generateContent").map(String::from);
    seen.api_key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    seen.body = Some(body);
    drop(seen);

    (stub.reply)()
}

async fn spawn_stub(reply: fn() -> Response) -> (SocketAddr, Arc<Mutex<Seen>>) {
    let seen = Arc::new(Mutex::new(Seen::default()));
    let app = Router::new()
        .route("/v1beta/models/{model_action}", post(generate))
        .with_state(Stub {
            reply,
            seen: seen.clone(),
        });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, seen)
}

fn client_for(addr: SocketAddr) -> GeminiClient {
    let base_url = format!("http://{addr}");
    let config = test_config(&[("GEMINI_BASE_URL", &base_url), ("GEMINI_MODEL", "test-model")]);
    GeminiClient::new(&config.gemini).unwrap()
}

fn text_reply(text: &'static str) -> Response {
    Json(json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    }))
    .into_response()
}

#[tokio::test]
async fn test_generate_sends_prompt_and_key() {
    let (addr, seen) = spawn_stub(|| text_reply("hello there")).await;
    let client = client_for(addr);

    let text = client.generate_content("Say hello").await.unwrap();
    assert_eq!(text, "hello there");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.model.as_deref(), Some("test-model"));
    assert_eq!(seen.api_key.as_deref(), Some("test-api-key"));
    let body = seen.body.as_ref().unwrap();
    assert_eq!(body["contents"][0]["parts"][0]["text"], "Say hello");
}

#[tokio::test]
async fn test_rate_limited() {
    let (addr, _) = spawn_stub(|| {
        (StatusCode::TOO_MANY_REQUESTS, [("retry-after", "7")], "slow down").into_response()
    })
    .await;

    let err = client_for(addr).generate_content("x").await.unwrap_err();
    assert!(matches!(err, ProviderError::RateLimited(7)));
}

#[tokio::test]
async fn test_rejected_key() {
    let (addr, _) = spawn_stub(|| StatusCode::FORBIDDEN.into_response()).await;

    let err = client_for(addr).generate_content("x").await.unwrap_err();
    assert!(matches!(err, ProviderError::Unauthorized(_)));
}

#[tokio::test]
async fn test_api_error_message_is_extracted() {
    let (addr, _) = spawn_stub(|| {
        (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": { "code": 404, "message": "model not found", "status": "NOT_FOUND" }
            })),
        )
            .into_response()
    })
    .await;

    let err = client_for(addr).generate_content("x").await.unwrap_err();
    match err {
        ProviderError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "model not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_no_candidates_is_empty_response() {
    let (addr, _) = spawn_stub(|| Json(json!({ "candidates": [] })).into_response()).await;

    let err = client_for(addr).generate_content("x").await.unwrap_err();
    assert!(matches!(err, ProviderError::EmptyResponse));
}

#[tokio::test]
async fn test_dashboard_end_to_end_through_client() {
    let (addr, _) = spawn_stub(|| {
        text_reply(
            "```json\n{\"title\":\"A\",\"description\":\"B\",\"targeting\":\"T\",\"adText\":\"C\"}\n```",
        )
    })
    .await;
    let client = client_for(addr);

    let app = TestApp::spawn(Arc::new(client)).await;
    let resp = app.get("/api/campaign-suggestion").await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["adText"], "C");
}
