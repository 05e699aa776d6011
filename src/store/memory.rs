//! Process-local phase store. Lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::traits::{StateStore, Versioned};
use crate::error::StoreError;
use crate::flow::{ConversationId, ConversationPhase};

/// In-memory store; compare-and-swap is atomic under the write lock.
#[derive(Default)]
pub struct InMemoryStateStore {
    entries: RwLock<HashMap<ConversationId, Versioned>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn get(&self, id: &ConversationId) -> Result<Option<Versioned>, StoreError> {
        Ok(self.entries.read().await.get(id).copied())
    }

    async fn compare_and_swap(
        &self,
        id: &ConversationId,
        expected: Option<u64>,
        phase: ConversationPhase,
    ) -> Result<u64, StoreError> {
        let mut entries = self.entries.write().await;
        let found = entries.get(id).map(|entry| entry.version);
        if found != expected {
            return Err(StoreError::Conflict {
                conversation_id: id.to_string(),
                expected,
                found,
            });
        }

        let version = found.map_or(1, |v| v + 1);
        entries.insert(id.clone(), Versioned { phase, version });
        debug!(conversation_id = %id, %phase, version, "Phase stored");
        Ok(version)
    }

    async fn len(&self) -> Result<usize, StoreError> {
        Ok(self.entries.read().await.len())
    }
}
