//! Runs transition actions against the platform collaborators.

use serde_json::Value;
use tracing::{debug, warn};

use super::action::Action;
use super::event::ConversationId;
use crate::error::PlatformError;
use crate::platform::{Attributes, Collaborators, OutgoingMessage};

/// What a successfully executed action produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutput {
    Done,
    /// Id of a newly provisioned conversation.
    Created(ConversationId),
}

/// Tally of one `execute_all` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    pub attempted: usize,
    pub failed: usize,
}

/// Executes actions one at a time, in order. No retries.
#[derive(Clone)]
pub struct ActionExecutor {
    platform: Collaborators,
}

impl ActionExecutor {
    pub fn new(platform: Collaborators) -> Self {
        Self { platform }
    }

    /// Execute a single action.
    pub async fn execute(&self, action: &Action) -> Result<ActionOutput, PlatformError> {
        match action {
            Action::SendText {
                conversation_id,
                text,
            } => {
                self.platform
                    .delivery
                    .send(conversation_id, &OutgoingMessage::text(text.as_str()))
                    .await?;
            }
            Action::SendOptions {
                conversation_id,
                prompt,
                options,
            } => {
                let message = OutgoingMessage::options(prompt.as_str(), options.clone());
                self.platform.delivery.send(conversation_id, &message).await?;
            }
            Action::SetAttribute {
                conversation_id,
                key,
                value,
            } => {
                let mut update = Attributes::new();
                update.insert(key.clone(), Value::String(value.clone()));
                self.platform
                    .attributes
                    .merge_attributes(conversation_id, update)
                    .await?;
            }
            Action::SetStatus {
                conversation_id,
                status,
            } => {
                self.platform
                    .status
                    .set_status(conversation_id, *status)
                    .await?;
            }
            Action::CreateConversation {
                contact_id,
                inbox_id,
                source_id,
            } => {
                let id = self
                    .platform
                    .provisioning
                    .create_conversation(contact_id, inbox_id, source_id)
                    .await?;
                return Ok(ActionOutput::Created(id));
            }
        }
        Ok(ActionOutput::Done)
    }

    /// Execute every action in order. A failure is logged and counted; the
    /// remaining actions still run.
    pub async fn execute_all(&self, actions: &[Action]) -> ExecutionReport {
        let mut report = ExecutionReport::default();
        for action in actions {
            report.attempted += 1;
            match self.execute(action).await {
                Ok(_) => debug!(action = action.kind(), "Action executed"),
                Err(e) => {
                    report.failed += 1;
                    warn!(action = action.kind(), error = %e, "Action failed");
                }
            }
        }
        report
    }
}
