//! Actions produced by transitions. Pure descriptions; executed by
//! [`ActionExecutor`](super::executor::ActionExecutor).

use serde::{Deserialize, Serialize};

use super::event::ConversationId;

/// Conversation status on the chat platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    Open,
    Pending,
    Resolved,
}

impl ConversationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Pending => "pending",
            Self::Resolved => "resolved",
        }
    }
}

impl std::fmt::Display for ConversationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a quick-reply menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuOption {
    pub title: String,
    pub value: String,
}

impl MenuOption {
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
        }
    }
}

/// Custom attribute keys collected by the flow.
pub mod attribute_keys {
    pub const CUSTOMER_NAME: &str = "customer_name";
    pub const PROJECT_NAME: &str = "project_name";
    pub const FRAMEWORK: &str = "framework";
}

/// Side effect to perform against the chat platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SendText {
        conversation_id: ConversationId,
        text: String,
    },
    SendOptions {
        conversation_id: ConversationId,
        prompt: String,
        options: Vec<MenuOption>,
    },
    SetAttribute {
        conversation_id: ConversationId,
        key: String,
        value: String,
    },
    SetStatus {
        conversation_id: ConversationId,
        status: ConversationStatus,
    },
    CreateConversation {
        contact_id: String,
        inbox_id: String,
        source_id: String,
    },
}

impl Action {
    pub fn send_text(conversation_id: &ConversationId, text: impl Into<String>) -> Self {
        Self::SendText {
            conversation_id: conversation_id.clone(),
            text: text.into(),
        }
    }

    pub fn set_attribute(
        conversation_id: &ConversationId,
        key: &str,
        value: impl Into<String>,
    ) -> Self {
        Self::SetAttribute {
            conversation_id: conversation_id.clone(),
            key: key.to_string(),
            value: value.into(),
        }
    }

    pub fn set_status(conversation_id: &ConversationId, status: ConversationStatus) -> Self {
        Self::SetStatus {
            conversation_id: conversation_id.clone(),
            status,
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SendText { .. } => "send_text",
            Self::SendOptions { .. } => "send_options",
            Self::SetAttribute { .. } => "set_attribute",
            Self::SetStatus { .. } => "set_status",
            Self::CreateConversation { .. } => "create_conversation",
        }
    }
}
