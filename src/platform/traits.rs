//! Collaborator traits for the chat platform.
//!
//! The flow engine only talks to the platform through these, so tests can
//! substitute recording fakes.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::PlatformError;
use crate::flow::{ConversationId, ConversationStatus, MenuOption};

/// Custom attributes attached to a conversation.
pub type Attributes = Map<String, Value>;

/// Content kind of an outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    /// Quick-reply menu; options are rendered in order.
    Options(Vec<MenuOption>),
}

/// Message to deliver into a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub content: String,
    pub kind: MessageKind,
}

impl OutgoingMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: MessageKind::Text,
        }
    }

    pub fn options(content: impl Into<String>, options: Vec<MenuOption>) -> Self {
        Self {
            content: content.into(),
            kind: MessageKind::Options(options),
        }
    }
}

/// Delivers bot messages to the end user.
#[async_trait]
pub trait MessageDelivery: Send + Sync {
    async fn send(
        &self,
        conversation_id: &ConversationId,
        message: &OutgoingMessage,
    ) -> Result<(), PlatformError>;
}

/// Conversation custom attribute storage.
#[async_trait]
pub trait AttributeStore: Send + Sync {
    /// Current custom attributes (empty when none are set).
    async fn get_attributes(&self, conversation_id: &ConversationId)
        -> Result<Attributes, PlatformError>;

    /// Write the full attribute set.
    async fn replace_attributes(
        &self,
        conversation_id: &ConversationId,
        attributes: &Attributes,
    ) -> Result<(), PlatformError>;

    /// Read-merge-write: keys in `updates` overwrite, all others are kept.
    /// Returns the merged set.
    ///
    /// Not atomic. Two merges on the same conversation that interleave
    /// between read and write lose the first writer's keys.
    async fn merge_attributes(
        &self,
        conversation_id: &ConversationId,
        updates: Attributes,
    ) -> Result<Attributes, PlatformError> {
        let mut merged = self.get_attributes(conversation_id).await?;
        merged.extend(updates);
        self.replace_attributes(conversation_id, &merged).await?;
        Ok(merged)
    }
}

/// Conversation status updates (open / pending / resolved).
#[async_trait]
pub trait StatusControl: Send + Sync {
    async fn set_status(
        &self,
        conversation_id: &ConversationId,
        status: ConversationStatus,
    ) -> Result<(), PlatformError>;
}

/// Creates conversations for widget triggers.
#[async_trait]
pub trait ConversationProvisioning: Send + Sync {
    async fn create_conversation(
        &self,
        contact_id: &str,
        inbox_id: &str,
        source_id: &str,
    ) -> Result<ConversationId, PlatformError>;
}

/// Handles to each collaborator, shared by the executor.
#[derive(Clone)]
pub struct Collaborators {
    pub delivery: Arc<dyn MessageDelivery>,
    pub attributes: Arc<dyn AttributeStore>,
    pub status: Arc<dyn StatusControl>,
    pub provisioning: Arc<dyn ConversationProvisioning>,
}

impl Collaborators {
    /// Use one client for every capability.
    pub fn from_platform<P>(platform: Arc<P>) -> Self
    where
        P: MessageDelivery + AttributeStore + StatusControl + ConversationProvisioning + 'static,
    {
        Self {
            delivery: platform.clone(),
            attributes: platform.clone(),
            status: platform.clone(),
            provisioning: platform,
        }
    }
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: MessageDelivery + ?Sized> MessageDelivery for Arc<T> {
    async fn send(
        &self,
        conversation_id: &ConversationId,
        message: &OutgoingMessage,
    ) -> Result<(), PlatformError> {
        (**self).send(conversation_id, message).await
    }
}

#[async_trait]
impl<T: AttributeStore + ?Sized> AttributeStore for Arc<T> {
    async fn get_attributes(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Attributes, PlatformError> {
        (**self).get_attributes(conversation_id).await
    }

    async fn replace_attributes(
        &self,
        conversation_id: &ConversationId,
        attributes: &Attributes,
    ) -> Result<(), PlatformError> {
        (**self).replace_attributes(conversation_id, attributes).await
    }

    async fn merge_attributes(
        &self,
        conversation_id: &ConversationId,
        updates: Attributes,
    ) -> Result<Attributes, PlatformError> {
        (**self).merge_attributes(conversation_id, updates).await
    }
}

#[async_trait]
impl<T: StatusControl + ?Sized> StatusControl for Arc<T> {
    async fn set_status(
        &self,
        conversation_id: &ConversationId,
        status: ConversationStatus,
    ) -> Result<(), PlatformError> {
        (**self).set_status(conversation_id, status).await
    }
}

#[async_trait]
impl<T: ConversationProvisioning + ?Sized> ConversationProvisioning for Arc<T> {
    async fn create_conversation(
        &self,
        contact_id: &str,
        inbox_id: &str,
        source_id: &str,
    ) -> Result<ConversationId, PlatformError> {
        (**self)
            .create_conversation(contact_id, inbox_id, source_id)
            .await
    }
}
