//! Chatwoot REST client: implements every platform collaborator.
//!
//! Each call is attempted once; failures come back as [`PlatformError`] and
//! the caller decides whether to log or abort.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::traits::{
    AttributeStore, Attributes, ConversationProvisioning, MessageDelivery, MessageKind,
    OutgoingMessage, StatusControl,
};
use crate::config::ChatwootConfig;
use crate::error::PlatformError;
use crate::flow::event::id_from_json;
use crate::flow::{ConversationId, ConversationStatus};

/// Header carrying the agent/bot access token.
const TOKEN_HEADER: &str = "api_access_token";

/// Chatwoot API client scoped to one account.
pub struct ChatwootClient {
    base_url: String,
    account_id: String,
    api_token: SecretString,
    client: reqwest::Client,
}

impl ChatwootClient {
    pub fn new(config: &ChatwootConfig) -> Result<Self, PlatformError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PlatformError::http("client setup", e))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            account_id: config.account_id.clone(),
            api_token: config.api_token.clone(),
            client,
        })
    }

    fn conversations_url(&self) -> String {
        format!(
            "{}/api/v1/accounts/{}/conversations",
            self.base_url, self.account_id
        )
    }

    fn conversation_url(&self, id: &ConversationId, suffix: &str) -> String {
        let base = format!("{}/{}", self.conversations_url(), id);
        if suffix.is_empty() {
            base
        } else {
            format!("{base}/{suffix}")
        }
    }

    async fn post_json(
        &self,
        operation: &str,
        url: String,
        body: &Value,
    ) -> Result<Value, PlatformError> {
        let resp = self
            .client
            .post(url)
            .header(TOKEN_HEADER, self.api_token.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| PlatformError::http(operation, e))?;
        read_json(operation, resp).await
    }

    async fn get_json(&self, operation: &str, url: String) -> Result<Value, PlatformError> {
        let resp = self
            .client
            .get(url)
            .header(TOKEN_HEADER, self.api_token.expose_secret())
            .send()
            .await
            .map_err(|e| PlatformError::http(operation, e))?;
        read_json(operation, resp).await
    }
}

/// Fail on non-2xx, otherwise parse the body (empty body reads as null).
async fn read_json(operation: &str, resp: reqwest::Response) -> Result<Value, PlatformError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(PlatformError::Status {
            operation: operation.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    let text = resp
        .text()
        .await
        .map_err(|e| PlatformError::http(operation, e))?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| PlatformError::InvalidResponse {
        operation: operation.to_string(),
        reason: e.to_string(),
    })
}

/// Numeric ids go out as JSON numbers, anything else as a string.
fn id_value(id: &str) -> Value {
    id.parse::<u64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::String(id.to_string()))
}

/// Request body for a bot message.
fn message_body(message: &OutgoingMessage) -> Value {
    let mut body = json!({
        "content": message.content,
        "message_type": "outgoing",
        "private": false,
    });
    if let MessageKind::Options(options) = &message.kind {
        body["content_type"] = json!("input_select");
        body["content_attributes"] = json!({ "items": options });
    }
    body
}

#[async_trait]
impl MessageDelivery for ChatwootClient {
    async fn send(
        &self,
        conversation_id: &ConversationId,
        message: &OutgoingMessage,
    ) -> Result<(), PlatformError> {
        let url = self.conversation_url(conversation_id, "messages");
        self.post_json("send message", url, &message_body(message))
            .await?;
        debug!(conversation_id = %conversation_id, "Message sent");
        Ok(())
    }
}

#[async_trait]
impl AttributeStore for ChatwootClient {
    async fn get_attributes(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Attributes, PlatformError> {
        let url = self.conversation_url(conversation_id, "");
        let conversation = self.get_json("get conversation", url).await?;
        Ok(conversation
            .get("custom_attributes")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default())
    }

    async fn replace_attributes(
        &self,
        conversation_id: &ConversationId,
        attributes: &Attributes,
    ) -> Result<(), PlatformError> {
        let url = self.conversation_url(conversation_id, "custom_attributes");
        self.post_json(
            "update custom attributes",
            url,
            &json!({ "custom_attributes": attributes }),
        )
        .await?;
        debug!(conversation_id = %conversation_id, keys = attributes.len(), "Custom attributes updated");
        Ok(())
    }
}

#[async_trait]
impl StatusControl for ChatwootClient {
    async fn set_status(
        &self,
        conversation_id: &ConversationId,
        status: ConversationStatus,
    ) -> Result<(), PlatformError> {
        let url = self.conversation_url(conversation_id, "toggle_status");
        self.post_json("toggle status", url, &json!({ "status": status }))
            .await?;
        info!(conversation_id = %conversation_id, status = %status, "Conversation status updated");
        Ok(())
    }
}

#[async_trait]
impl ConversationProvisioning for ChatwootClient {
    async fn create_conversation(
        &self,
        contact_id: &str,
        inbox_id: &str,
        source_id: &str,
    ) -> Result<ConversationId, PlatformError> {
        let body = json!({
            "source_id": source_id,
            "inbox_id": id_value(inbox_id),
            "contact_id": id_value(contact_id),
        });
        let created = self
            .post_json("create conversation", self.conversations_url(), &body)
            .await?;

        let id = created
            .get("id")
            .and_then(id_from_json)
            .map(ConversationId)
            .ok_or_else(|| PlatformError::InvalidResponse {
                operation: "create conversation".to_string(),
                reason: "response has no conversation id".to_string(),
            })?;
        info!(conversation_id = %id, contact_id, inbox_id, "Conversation created");
        Ok(id)
    }
}
