//! Chat platform collaborators: message delivery, custom attributes,
//! status control and conversation provisioning.

pub mod chatwoot;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use chatwoot::ChatwootClient;
pub use traits::{
    AttributeStore, Attributes, Collaborators, ConversationProvisioning, MessageDelivery,
    MessageKind, OutgoingMessage, StatusControl,
};
