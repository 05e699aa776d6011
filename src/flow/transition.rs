//! Pure transition function for the intake flow.
//!
//! Given the same phase, event and context this always produces the same
//! result. No I/O happens here; the engine commits the new phase and hands
//! the actions to the executor.

use super::action::{attribute_keys, Action, ConversationStatus};
use super::event::{ConversationId, Event};
use super::messages::{FlowMessages, BOOK_DEMO, CONNECT_AGENT};
use super::state::ConversationPhase;

/// Inputs decided outside the state machine.
#[derive(Debug, Clone, Copy)]
pub struct FlowContext<'a> {
    pub messages: &'a FlowMessages,
    /// Consumed only when building the final menu.
    pub within_business_hours: bool,
}

/// Result of a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    pub new_phase: ConversationPhase,
    pub actions: Vec<Action>,
}

impl TransitionResult {
    pub fn new(phase: ConversationPhase) -> Self {
        Self {
            new_phase: phase,
            actions: vec![],
        }
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }
}

/// Apply an event to the current phase of a conversation.
///
/// `ConversationTriggered` only plans the provisioning call; the phase of
/// the new conversation is set by [`conversation_started`] once the
/// platform has returned its id. `Ignored` never changes anything.
pub fn apply(phase: ConversationPhase, event: &Event, context: &FlowContext<'_>) -> TransitionResult {
    match event {
        Event::ConversationTriggered {
            contact_id,
            inbox_id,
            source_id,
        } => TransitionResult::new(phase).with_action(Action::CreateConversation {
            contact_id: contact_id.clone(),
            inbox_id: inbox_id.clone(),
            source_id: source_id.clone(),
        }),
        Event::IncomingMessage {
            conversation_id,
            text,
        } => on_message(phase, conversation_id, text, context),
        Event::Ignored { .. } => TransitionResult::new(phase),
    }
}

/// First phase and greeting for a freshly provisioned conversation.
pub fn conversation_started(
    conversation_id: &ConversationId,
    messages: &FlowMessages,
) -> TransitionResult {
    TransitionResult::new(ConversationPhase::AwaitingName)
        .with_action(Action::send_text(conversation_id, &messages.welcome))
}

fn on_message(
    phase: ConversationPhase,
    id: &ConversationId,
    text: &str,
    context: &FlowContext<'_>,
) -> TransitionResult {
    use ConversationPhase::*;
    let messages = context.messages;

    match phase {
        AwaitingName => TransitionResult::new(AwaitingProject)
            .with_action(Action::set_attribute(id, attribute_keys::CUSTOMER_NAME, text))
            .with_action(Action::send_text(id, &messages.ask_project)),

        AwaitingProject => TransitionResult::new(AwaitingFramework)
            .with_action(Action::set_attribute(id, attribute_keys::PROJECT_NAME, text))
            .with_action(Action::send_text(id, &messages.ask_framework)),

        AwaitingFramework => {
            let (prompt, options) = messages.menu(context.within_business_hours);
            TransitionResult::new(AwaitingChoice)
                .with_action(Action::set_attribute(id, attribute_keys::FRAMEWORK, text))
                .with_action(Action::SendOptions {
                    conversation_id: id.clone(),
                    prompt,
                    options,
                })
        }

        // Menu values arrive verbatim from button clicks.
        AwaitingChoice => match text {
            CONNECT_AGENT => TransitionResult::new(HandedOff)
                .with_action(Action::send_text(id, &messages.handoff))
                .with_action(Action::set_status(id, ConversationStatus::Open)),
            BOOK_DEMO => TransitionResult::new(Completed)
                .with_action(Action::send_text(id, &messages.booking))
                .with_action(Action::set_status(id, ConversationStatus::Resolved)),
            _ => TransitionResult::new(AwaitingChoice)
                .with_action(Action::send_text(id, &messages.reprompt)),
        },

        HandedOff | Completed => TransitionResult::new(phase),

        // No recorded phase: assume it was lost and restart.
        Unknown => TransitionResult::new(AwaitingName)
            .with_action(Action::send_text(id, &messages.restart)),
    }
}
