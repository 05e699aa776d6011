//! Intake flow: collects name, project and framework, then routes the user
//! to a human agent or a booking link.
//!
//! Transitions are pure (`transition`); the `FlowEngine` owns state lookup
//! and commit, and the `ActionExecutor` performs the side effects.

pub mod action;
pub mod engine;
pub mod event;
pub mod executor;
pub mod messages;
pub mod state;
pub mod transition;

pub use action::{Action, ConversationStatus, MenuOption};
pub use engine::{FailureReason, FlowEngine, HandleOutcome};
pub use event::{ConversationId, Event, IgnoreReason};
pub use executor::{ActionExecutor, ActionOutput, ExecutionReport};
pub use messages::FlowMessages;
pub use state::ConversationPhase;
pub use transition::{FlowContext, TransitionResult};
