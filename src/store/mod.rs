//! Conversation phase storage.

pub mod memory;
pub mod traits;

pub use memory::InMemoryStateStore;
pub use traits::{StateStore, Versioned};
