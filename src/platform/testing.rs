//! Recording fake of the chat platform for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use super::traits::*;
use crate::error::PlatformError;
use crate::flow::{ConversationId, ConversationStatus};

/// One recorded platform call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Send(ConversationId, OutgoingMessage),
    ReplaceAttributes(ConversationId, Attributes),
    SetStatus(ConversationId, ConversationStatus),
    Create {
        contact_id: String,
        inbox_id: String,
        source_id: String,
    },
}

/// In-memory platform that records calls and can be told to fail.
#[derive(Default)]
pub struct RecordingPlatform {
    calls: Mutex<Vec<Call>>,
    attributes: Mutex<HashMap<ConversationId, Attributes>>,
    failing: Mutex<HashSet<&'static str>>,
    next_id: Mutex<u64>,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self {
            next_id: Mutex::new(100),
            ..Default::default()
        }
    }

    /// Make every call of `operation` fail: "send", "attributes", "status",
    /// or "create".
    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn attributes(&self, id: &ConversationId) -> Attributes {
        self.attributes
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn sent_texts(&self, id: &ConversationId) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Send(cid, message) if &cid == id => Some(message.content),
                _ => None,
            })
            .collect()
    }

    fn check(&self, operation: &'static str) -> Result<(), PlatformError> {
        if self.failing.lock().unwrap().contains(operation) {
            return Err(PlatformError::Status {
                operation: operation.to_string(),
                status: 500,
                body: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MessageDelivery for RecordingPlatform {
    async fn send(
        &self,
        conversation_id: &ConversationId,
        message: &OutgoingMessage,
    ) -> Result<(), PlatformError> {
        self.check("send")?;
        self.record(Call::Send(conversation_id.clone(), message.clone()));
        Ok(())
    }
}

#[async_trait]
impl AttributeStore for RecordingPlatform {
    async fn get_attributes(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Attributes, PlatformError> {
        self.check("attributes")?;
        Ok(self.attributes(conversation_id))
    }

    async fn replace_attributes(
        &self,
        conversation_id: &ConversationId,
        attributes: &Attributes,
    ) -> Result<(), PlatformError> {
        self.check("attributes")?;
        self.attributes
            .lock()
            .unwrap()
            .insert(conversation_id.clone(), attributes.clone());
        self.record(Call::ReplaceAttributes(
            conversation_id.clone(),
            attributes.clone(),
        ));
        Ok(())
    }
}

#[async_trait]
impl StatusControl for RecordingPlatform {
    async fn set_status(
        &self,
        conversation_id: &ConversationId,
        status: ConversationStatus,
    ) -> Result<(), PlatformError> {
        self.check("status")?;
        self.record(Call::SetStatus(conversation_id.clone(), status));
        Ok(())
    }
}

#[async_trait]
impl ConversationProvisioning for RecordingPlatform {
    async fn create_conversation(
        &self,
        contact_id: &str,
        inbox_id: &str,
        source_id: &str,
    ) -> Result<ConversationId, PlatformError> {
        self.check("create")?;
        self.record(Call::Create {
            contact_id: contact_id.to_string(),
            inbox_id: inbox_id.to_string(),
            source_id: source_id.to_string(),
        });
        let mut next = self.next_id.lock().unwrap();
        let id = ConversationId::from(*next);
        *next += 1;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn merge_keeps_existing_keys() {
        let platform = RecordingPlatform::new();
        let id = ConversationId::from(1);

        let mut first = Attributes::new();
        first.insert("customer_name".into(), json!("Alice"));
        platform.merge_attributes(&id, first).await.unwrap();

        let mut second = Attributes::new();
        second.insert("project_name".into(), json!("Shop"));
        let merged = platform.merge_attributes(&id, second).await.unwrap();

        assert_eq!(merged.get("customer_name"), Some(&json!("Alice")));
        assert_eq!(merged.get("project_name"), Some(&json!("Shop")));
        assert_eq!(platform.attributes(&id), merged);
    }

    #[tokio::test]
    async fn merge_overwrites_same_key() {
        let platform = RecordingPlatform::new();
        let id = ConversationId::from(1);

        for name in ["Alice", "Bob"] {
            let mut update = Attributes::new();
            update.insert("customer_name".into(), json!(name));
            platform.merge_attributes(&id, update).await.unwrap();
        }

        assert_eq!(platform.attributes(&id).get("customer_name"), Some(&json!("Bob")));
    }

    #[tokio::test]
    async fn merge_fails_when_read_fails() {
        let platform = RecordingPlatform::new();
        platform.fail("attributes");
        let result = platform
            .merge_attributes(&ConversationId::from(1), Attributes::new())
            .await;
        assert!(result.is_err());
        assert!(platform.calls().is_empty());
    }
}
