//! Fake Chatwoot API for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;

pub const ACCOUNT_ID: &str = "137894";
pub const TOKEN: &str = "test-token";

/// A request the fake received.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub body: Value,
}

#[derive(Default)]
pub struct FakeState {
    pub requests: Vec<Recorded>,
    pub attributes: HashMap<String, Map<String, Value>>,
    pub next_id: u64,
    pub fail_create: bool,
    pub fail_messages: bool,
}

#[derive(Clone)]
pub struct FakeChatwoot {
    pub state: Arc<Mutex<FakeState>>,
    pub base_url: String,
}

impl FakeChatwoot {
    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn attributes(&self, conversation_id: &str) -> Map<String, Value> {
        self.state
            .lock()
            .unwrap()
            .attributes
            .get(conversation_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Bodies of messages posted to a conversation, in order.
    pub fn messages(&self, conversation_id: &str) -> Vec<Value> {
        let path = format!("/api/v1/accounts/{ACCOUNT_ID}/conversations/{conversation_id}/messages");
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .map(|r| r.body)
            .collect()
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.state.lock().unwrap().fail_create = fail;
    }

    pub fn set_fail_messages(&self, fail: bool) {
        self.state.lock().unwrap().fail_messages = fail;
    }
}

type Shared = Arc<Mutex<FakeState>>;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("api_access_token")
        .and_then(|v| v.to_str().ok())
        == Some(TOKEN)
}

fn record(state: &Shared, method: &'static str, path: String, body: Value) {
    state.lock().unwrap().requests.push(Recorded { method, path, body });
}

async fn create_conversation(
    State(state): State<Shared>,
    Path(account): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "unauthorized"})));
    }
    record(
        &state,
        "POST",
        format!("/api/v1/accounts/{account}/conversations"),
        body,
    );
    let mut guard = state.lock().unwrap();
    if guard.fail_create {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"error": "source_id taken"})),
        );
    }
    guard.next_id += 1;
    let id = 1000 + guard.next_id;
    (StatusCode::OK, Json(json!({"id": id, "status": "pending"})))
}

async fn get_conversation(
    State(state): State<Shared>,
    Path((account, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "unauthorized"})));
    }
    record(
        &state,
        "GET",
        format!("/api/v1/accounts/{account}/conversations/{id}"),
        Value::Null,
    );
    let guard = state.lock().unwrap();
    match guard.attributes.get(&id) {
        Some(attributes) => (
            StatusCode::OK,
            Json(json!({"id": id, "custom_attributes": attributes})),
        ),
        // Conversations without attributes omit the key entirely.
        None => (StatusCode::OK, Json(json!({"id": id}))),
    }
}

async fn conversation_action(
    State(state): State<Shared>,
    Path((account, id, action)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "unauthorized"})));
    }
    record(
        &state,
        "POST",
        format!("/api/v1/accounts/{account}/conversations/{id}/{action}"),
        body.clone(),
    );
    let mut guard = state.lock().unwrap();
    match action.as_str() {
        "messages" if guard.fail_messages => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "boom"})),
        ),
        "messages" => (StatusCode::OK, Json(json!({"id": 1, "content": body["content"]}))),
        "custom_attributes" => {
            let attributes = body["custom_attributes"]
                .as_object()
                .cloned()
                .unwrap_or_default();
            guard.attributes.insert(id, attributes.clone());
            (StatusCode::OK, Json(json!({"custom_attributes": attributes})))
        }
        "toggle_status" => (
            StatusCode::OK,
            Json(json!({"payload": {"success": true, "current_status": body["status"]}})),
        ),
        _ => (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))),
    }
}

/// Start the fake on a random port.
pub async fn start_fake_chatwoot() -> FakeChatwoot {
    let state: Shared = Arc::new(Mutex::new(FakeState::default()));
    let app = Router::new()
        .route(
            "/api/v1/accounts/{account}/conversations",
            post(create_conversation),
        )
        .route(
            "/api/v1/accounts/{account}/conversations/{id}",
            get(get_conversation),
        )
        .route(
            "/api/v1/accounts/{account}/conversations/{id}/{action}",
            post(conversation_action),
        )
        .with_state(Arc::clone(&state));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(20)).await;

    FakeChatwoot {
        state,
        base_url: format!("http://127.0.0.1:{port}"),
    }
}
