//! HTTP endpoints: the webhook receiver and the health check.
//!
//! Business outcomes (ignored deliveries, collaborator failures) are always
//! reported with HTTP 200 and a `status` field.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use super::classify::classify_body;
use crate::flow::{FlowEngine, HandleOutcome};

/// Shared state for webhook routes.
#[derive(Clone)]
pub struct WebhookState {
    pub engine: Arc<FlowEngine>,
}

/// Body of every webhook response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

impl From<&HandleOutcome> for WebhookResponse {
    fn from(outcome: &HandleOutcome) -> Self {
        match outcome {
            HandleOutcome::Started { .. } => Self {
                status: "success",
                message: Some("First question sent"),
                reason: None,
            },
            HandleOutcome::Advanced { .. } => Self {
                status: "success",
                message: None,
                reason: None,
            },
            HandleOutcome::Ignored { reason } => Self {
                status: "ignored",
                message: None,
                reason: Some(reason.message()),
            },
            HandleOutcome::Failed { reason } => Self {
                status: "error",
                message: None,
                reason: Some(reason.message()),
            },
        }
    }
}

/// POST /webhook
///
/// Accepts any body; payloads that cannot drive the flow are answered with
/// `"status": "ignored"`.
async fn handle_webhook(State(state): State<WebhookState>, body: Bytes) -> impl IntoResponse {
    let delivery_id = Uuid::new_v4();
    let span = info_span!("webhook", %delivery_id);

    async move {
        let event = classify_body(&body);
        info!(event = event.kind(), "Webhook received");

        let outcome = state.engine.handle(event).await;
        Json(WebhookResponse::from(&outcome))
    }
    .instrument(span)
    .await
}

/// GET / and GET /health
async fn health(State(state): State<WebhookState>) -> impl IntoResponse {
    let active = match state.engine.tracked_conversations().await {
        Ok(count) => Some(count),
        Err(e) => {
            warn!(error = %e, "Could not count tracked conversations");
            None
        }
    };
    Json(serde_json::json!({
        "status": "running",
        "message": "Chatwoot webhook server is active",
        "active_conversations": active,
    }))
}

/// Build the webhook and health routes.
pub fn webhook_routes(engine: Arc<FlowEngine>) -> Router {
    let state = WebhookState { engine };

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/webhook", post(handle_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
