//! FlowEngine looks up a conversation's phase, applies the transition,
//! commits the new phase and then executes the resulting actions.
//!
//! Commits are optimistic: the phase advances before any message is
//! delivered, and a failed delivery does not roll it back. A conflicting
//! concurrent commit for the same conversation makes the loser re-read and
//! recompute; its actions are never executed.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::event::{ConversationId, Event, IgnoreReason};
use super::executor::{ActionExecutor, ActionOutput};
use super::messages::FlowMessages;
use super::state::ConversationPhase;
use super::transition::{self, FlowContext};
use crate::config::AppConfig;
use crate::error::{Result, StoreError};
use crate::hours::{self, BusinessHours};
use crate::platform::{ChatwootClient, Collaborators};
use crate::store::{InMemoryStateStore, StateStore};

/// Commit attempts per delivery before giving up on a contended conversation.
const MAX_COMMIT_ATTEMPTS: u32 = 3;

/// Why a delivery could not be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    ConversationCreation,
    StateConflict,
    StoreUnavailable,
}

impl FailureReason {
    pub fn message(&self) -> &'static str {
        match self {
            Self::ConversationCreation => "Conversation creation failed",
            Self::StateConflict => "Conversation state changed concurrently",
            Self::StoreUnavailable => "Conversation state unavailable",
        }
    }
}

/// Result of handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    /// A widget trigger provisioned a conversation and greeted the user.
    Started {
        conversation_id: ConversationId,
        failed_actions: usize,
    },
    /// A message moved (or kept) the conversation in the flow.
    Advanced {
        conversation_id: ConversationId,
        from: ConversationPhase,
        to: ConversationPhase,
        failed_actions: usize,
    },
    Ignored { reason: IgnoreReason },
    Failed { reason: FailureReason },
}

/// Drives conversations through the intake flow.
pub struct FlowEngine {
    store: Arc<dyn StateStore>,
    executor: ActionExecutor,
    hours: Box<dyn BusinessHours>,
    messages: FlowMessages,
}

impl FlowEngine {
    pub fn new(
        store: Arc<dyn StateStore>,
        executor: ActionExecutor,
        hours: Box<dyn BusinessHours>,
        messages: FlowMessages,
    ) -> Self {
        Self {
            store,
            executor,
            hours,
            messages,
        }
    }

    /// Production wiring: Chatwoot client, in-memory store.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = Arc::new(ChatwootClient::new(&config.chatwoot)?);
        Ok(Self::new(
            Arc::new(InMemoryStateStore::new()),
            ActionExecutor::new(Collaborators::from_platform(client)),
            hours::from_config(&config.business_hours),
            FlowMessages::with_booking_link(&config.booking_link),
        ))
    }

    /// Number of conversations with a recorded phase.
    pub async fn tracked_conversations(&self) -> std::result::Result<usize, StoreError> {
        self.store.len().await
    }

    /// Handle one classified webhook event.
    pub async fn handle(&self, event: Event) -> HandleOutcome {
        match &event {
            Event::Ignored { reason } => {
                debug!(%reason, "Ignoring delivery");
                HandleOutcome::Ignored { reason: *reason }
            }
            Event::ConversationTriggered { .. } => self.start_conversation(&event).await,
            Event::IncomingMessage {
                conversation_id, ..
            } => self.advance(conversation_id, &event).await,
        }
    }

    fn context(&self, phase: ConversationPhase) -> FlowContext<'_> {
        // The oracle only matters when the menu is about to be built.
        let within_business_hours =
            phase != ConversationPhase::AwaitingFramework || self.hours.is_open(Utc::now());
        FlowContext {
            messages: &self.messages,
            within_business_hours,
        }
    }

    async fn start_conversation(&self, event: &Event) -> HandleOutcome {
        let plan = transition::apply(
            ConversationPhase::Unknown,
            event,
            &self.context(ConversationPhase::Unknown),
        );

        let mut created = None;
        for action in &plan.actions {
            match self.executor.execute(action).await {
                Ok(ActionOutput::Created(id)) => created = Some(id),
                Ok(ActionOutput::Done) => {}
                Err(e) => {
                    warn!(error = %e, action = action.kind(), "Could not provision conversation");
                    return HandleOutcome::Failed {
                        reason: FailureReason::ConversationCreation,
                    };
                }
            }
        }
        let Some(conversation_id) = created else {
            return HandleOutcome::Failed {
                reason: FailureReason::ConversationCreation,
            };
        };

        let started = transition::conversation_started(&conversation_id, &self.messages);
        if let Err(reason) = self.overwrite_phase(&conversation_id, started.new_phase).await {
            return HandleOutcome::Failed { reason };
        }

        let report = self.executor.execute_all(&started.actions).await;
        info!(
            conversation_id = %conversation_id,
            phase = %started.new_phase,
            failed_actions = report.failed,
            "Conversation started"
        );
        HandleOutcome::Started {
            conversation_id,
            failed_actions: report.failed,
        }
    }

    /// Store `phase` whatever the conversation held before. The platform may
    /// hand back an id that already has an entry; a fresh start replaces it.
    async fn overwrite_phase(
        &self,
        conversation_id: &ConversationId,
        phase: ConversationPhase,
    ) -> std::result::Result<u64, FailureReason> {
        let mut expected = None;
        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            match self
                .store
                .compare_and_swap(conversation_id, expected, phase)
                .await
            {
                Ok(version) => return Ok(version),
                Err(StoreError::Conflict { found, .. }) => {
                    debug!(conversation_id = %conversation_id, attempt, ?found, "Replacing existing conversation state");
                    expected = found;
                }
                Err(e) => {
                    warn!(conversation_id = %conversation_id, error = %e, "Could not record new conversation");
                    return Err(failure_for(&e));
                }
            }
        }

        warn!(conversation_id = %conversation_id, attempts = MAX_COMMIT_ATTEMPTS, "Could not record new conversation");
        Err(FailureReason::StateConflict)
    }

    async fn advance(&self, conversation_id: &ConversationId, event: &Event) -> HandleOutcome {
        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            let stored = match self.store.get(conversation_id).await {
                Ok(stored) => stored,
                Err(e) => {
                    warn!(conversation_id = %conversation_id, error = %e, "Could not read conversation state");
                    return HandleOutcome::Failed {
                        reason: FailureReason::StoreUnavailable,
                    };
                }
            };
            let phase = ConversationPhase::or_unknown(stored.map(|s| s.phase));

            match phase {
                ConversationPhase::HandedOff => {
                    info!(conversation_id = %conversation_id, "Conversation is with an agent, ignoring message");
                    return HandleOutcome::Ignored {
                        reason: IgnoreReason::HandedOff,
                    };
                }
                ConversationPhase::Completed => {
                    info!(conversation_id = %conversation_id, "Conversation already completed, ignoring message");
                    return HandleOutcome::Ignored {
                        reason: IgnoreReason::Completed,
                    };
                }
                ConversationPhase::Unknown => {
                    info!(conversation_id = %conversation_id, "No state for conversation, restarting flow");
                }
                _ => {}
            }

            let result = transition::apply(phase, event, &self.context(phase));
            debug_assert!(phase.can_transition_to(result.new_phase));

            match self
                .store
                .compare_and_swap(conversation_id, stored.map(|s| s.version), result.new_phase)
                .await
            {
                Ok(_) => {}
                Err(StoreError::Conflict { .. }) => {
                    debug!(conversation_id = %conversation_id, attempt, "State changed underneath, retrying");
                    continue;
                }
                Err(e) => {
                    warn!(conversation_id = %conversation_id, error = %e, "Could not commit conversation state");
                    return HandleOutcome::Failed {
                        reason: FailureReason::StoreUnavailable,
                    };
                }
            }

            let report = self.executor.execute_all(&result.actions).await;
            info!(
                conversation_id = %conversation_id,
                from = %phase,
                to = %result.new_phase,
                actions = report.attempted,
                failed_actions = report.failed,
                "Transition applied"
            );
            return HandleOutcome::Advanced {
                conversation_id: conversation_id.clone(),
                from: phase,
                to: result.new_phase,
                failed_actions: report.failed,
            };
        }

        warn!(conversation_id = %conversation_id, attempts = MAX_COMMIT_ATTEMPTS, "Giving up on contended conversation");
        HandleOutcome::Failed {
            reason: FailureReason::StateConflict,
        }
    }
}

fn failure_for(error: &StoreError) -> FailureReason {
    match error {
        StoreError::Conflict { .. } => FailureReason::StateConflict,
        StoreError::Backend(_) => FailureReason::StoreUnavailable,
    }
}
