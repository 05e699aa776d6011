//! Normalized webhook events fed into the flow engine.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Platform conversation identifier. Opaque; numeric ids are kept in their
/// decimal string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for ConversationId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Read an identifier that may arrive as a JSON number or string.
///
/// Zero, blank strings and null count as missing.
pub fn id_from_json(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        _ => None,
    }
}

/// Why a webhook delivery was not acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// Body was not a JSON document.
    InvalidPayload,
    /// Widget trigger without contact, inbox and source ids.
    MissingIds,
    NotMessageCreated,
    /// Outgoing or bot-authored message.
    NotIncoming,
    MissingConversationId,
    HandedOff,
    Completed,
}

impl IgnoreReason {
    /// Human-readable reason returned in the webhook response body.
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidPayload => "Invalid payload",
            Self::MissingIds => "Missing IDs",
            Self::NotMessageCreated => "Not a message_created event",
            Self::NotIncoming => "Not an incoming message",
            Self::MissingConversationId => "Missing conversation id",
            Self::HandedOff => "Handed off to agent",
            Self::Completed => "Conversation completed",
        }
    }
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// One event per accepted webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The chat widget was opened; a conversation must be provisioned.
    ConversationTriggered {
        contact_id: String,
        inbox_id: String,
        source_id: String,
    },
    /// A user-authored message in an existing conversation.
    IncomingMessage {
        conversation_id: ConversationId,
        text: String,
    },
    Ignored { reason: IgnoreReason },
}

impl Event {
    pub fn ignored(reason: IgnoreReason) -> Self {
        Self::Ignored { reason }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConversationTriggered { .. } => "conversation_triggered",
            Self::IncomingMessage { .. } => "incoming_message",
            Self::Ignored { .. } => "ignored",
        }
    }
}
