//! Conversation phase store with compare-and-swap writes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::flow::{ConversationId, ConversationPhase};

/// A stored phase and the version it was written at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Versioned {
    pub phase: ConversationPhase,
    /// Starts at 1 and increases by one per write.
    pub version: u64,
}

/// Backend-agnostic phase store.
///
/// Entries are independent: a write only ever conflicts with another write
/// to the same conversation.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Current entry, if the conversation has one.
    async fn get(&self, id: &ConversationId) -> Result<Option<Versioned>, StoreError>;

    /// Write `phase` if the stored version still equals `expected`
    /// (`None` = no entry yet). Returns the new version, or
    /// [`StoreError::Conflict`] when another writer got there first.
    async fn compare_and_swap(
        &self,
        id: &ConversationId,
        expected: Option<u64>,
        phase: ConversationPhase,
    ) -> Result<u64, StoreError>;

    /// Number of tracked conversations.
    async fn len(&self) -> Result<usize, StoreError>;
}

#[async_trait]
impl<T: StateStore + ?Sized> StateStore for Arc<T> {
    async fn get(&self, id: &ConversationId) -> Result<Option<Versioned>, StoreError> {
        (**self).get(id).await
    }

    async fn compare_and_swap(
        &self,
        id: &ConversationId,
        expected: Option<u64>,
        phase: ConversationPhase,
    ) -> Result<u64, StoreError> {
        (**self).compare_and_swap(id, expected, phase).await
    }

    async fn len(&self) -> Result<usize, StoreError> {
        (**self).len().await
    }
}
