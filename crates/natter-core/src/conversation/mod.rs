//! Conversation domain types: identifiers, summaries, and messages.

pub mod message;
pub mod model;

pub use message::{Message, MessageRole};
pub use model::{
    Conversation, ConversationId, ConversationSummary, title_for_new_conversation,
};
