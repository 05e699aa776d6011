//! Turns raw webhook payloads into flow events.
//!
//! Never fails: anything that cannot drive the flow becomes
//! [`Event::Ignored`] with a reason.

use serde_json::Value;

use crate::flow::event::id_from_json;
use crate::flow::{ConversationId, Event, IgnoreReason};

/// Event name sent when the chat widget is opened.
pub const WIDGET_TRIGGERED: &str = "webwidget_triggered";

/// Event name sent for every new message, in either direction.
pub const MESSAGE_CREATED: &str = "message_created";

/// Message type of user-authored messages.
pub const INCOMING: &str = "incoming";

/// Classify a raw request body.
pub fn classify_body(body: &[u8]) -> Event {
    match serde_json::from_slice::<Value>(body) {
        Ok(payload) => classify(&payload),
        Err(e) => {
            tracing::debug!(error = %e, "Webhook body is not JSON");
            Event::ignored(IgnoreReason::InvalidPayload)
        }
    }
}

/// Classify a parsed payload.
pub fn classify(payload: &Value) -> Event {
    let event = payload
        .get("event")
        .and_then(Value::as_str)
        .unwrap_or_default();

    if event == WIDGET_TRIGGERED {
        let contact_id = payload.pointer("/contact/id").and_then(id_from_json);
        let inbox_id = payload.pointer("/inbox/id").and_then(id_from_json);
        let source_id = payload.get("source_id").and_then(id_from_json);

        return match (contact_id, inbox_id, source_id) {
            (Some(contact_id), Some(inbox_id), Some(source_id)) => Event::ConversationTriggered {
                contact_id,
                inbox_id,
                source_id,
            },
            _ => Event::ignored(IgnoreReason::MissingIds),
        };
    }

    if event != MESSAGE_CREATED {
        return Event::ignored(IgnoreReason::NotMessageCreated);
    }

    // Outgoing messages include the bot's own replies.
    if payload.get("message_type").and_then(Value::as_str) != Some(INCOMING) {
        return Event::ignored(IgnoreReason::NotIncoming);
    }

    let Some(conversation_id) = payload.pointer("/conversation/id").and_then(id_from_json) else {
        return Event::ignored(IgnoreReason::MissingConversationId);
    };

    let text = payload
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();

    Event::IncomingMessage {
        conversation_id: ConversationId(conversation_id),
        text,
    }
}
