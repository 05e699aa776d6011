//! Conversation phases: where in the intake flow a conversation is.

use serde::{Deserialize, Serialize};

/// The phases of the intake conversation.
///
/// Progresses linearly: AwaitingName → AwaitingProject → AwaitingFramework →
/// AwaitingChoice, then ends in either HandedOff or Completed. `Unknown`
/// stands for a conversation with no recorded phase and is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversationPhase {
    #[default]
    Unknown,
    AwaitingName,
    AwaitingProject,
    AwaitingFramework,
    AwaitingChoice,
    HandedOff,
    Completed,
}

impl ConversationPhase {
    /// Check if a transition from `self` to `target` is valid.
    ///
    /// Staying in place is allowed for the choice menu (re-prompt) and the
    /// terminal phases (ignored messages).
    pub fn can_transition_to(&self, target: ConversationPhase) -> bool {
        use ConversationPhase::*;
        matches!(
            (self, target),
            (Unknown, AwaitingName)
                | (AwaitingName, AwaitingProject)
                | (AwaitingProject, AwaitingFramework)
                | (AwaitingFramework, AwaitingChoice)
                | (AwaitingChoice, AwaitingChoice)
                | (AwaitingChoice, HandedOff)
                | (AwaitingChoice, Completed)
                | (HandedOff, HandedOff)
                | (Completed, Completed)
        )
    }

    /// Whether the bot has stopped responding in this phase.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::HandedOff | Self::Completed)
    }

    /// Phase for a possibly-missing stored value.
    pub fn or_unknown(stored: Option<ConversationPhase>) -> ConversationPhase {
        stored.unwrap_or(Self::Unknown)
    }
}

impl std::fmt::Display for ConversationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unknown => "unknown",
            Self::AwaitingName => "awaiting_name",
            Self::AwaitingProject => "awaiting_project",
            Self::AwaitingFramework => "awaiting_framework",
            Self::AwaitingChoice => "awaiting_choice",
            Self::HandedOff => "handed_off",
            Self::Completed => "completed",
        };
        write!(f, "{s}")
    }
}
