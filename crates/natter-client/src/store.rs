//! Conversation store trait.
//!
//! Defines the interface the UI layer programs against, decoupling it
//! from the HTTP implementation.

use crate::stream::ChatEvent;
use async_trait::async_trait;
use natter_core::Result;
use natter_core::conversation::{ConversationId, ConversationSummary, Message};
use tokio::sync::mpsc::UnboundedSender;

/// An abstract store of conversations held by the remote service.
///
/// Every operation is a single request/response pair with no retry
/// logic; a failure is terminal for that user action.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Creates a conversation with the given title.
    ///
    /// # Returns
    ///
    /// The identifier assigned by the service together with the echoed
    /// title.
    async fn create(&self, title: &str) -> Result<ConversationSummary>;

    /// Lists conversation summaries for the sidebar, most recent first.
    async fn list(&self) -> Result<Vec<ConversationSummary>>;

    /// Loads the message history of a conversation.
    ///
    /// A logical error reported by the service (`{"error": ...}`) is
    /// returned as [`natter_core::NatterError::Service`].
    async fn load(&self, id: &ConversationId) -> Result<Vec<Message>>;

    /// Renames a conversation. Succeeds only when the service confirms
    /// with `{"success": true}`; a non-success HTTP status is a failure.
    async fn rename(&self, id: &ConversationId, title: &str) -> Result<()>;

    /// Deletes a conversation. Succeeds only when the service confirms
    /// with `{"success": true}`.
    async fn delete(&self, id: &ConversationId) -> Result<()>;

    /// Sends a user message and streams the assistant reply.
    ///
    /// Progress is reported over `events`: [`ChatEvent::Opened`] once the
    /// response status is known good, one [`ChatEvent::Chunk`] per decoded
    /// piece of text, then [`ChatEvent::Done`] or [`ChatEvent::Failed`].
    /// The method returns once the stream is finished or failed.
    async fn chat(
        &self,
        id: &ConversationId,
        message: &str,
        events: UnboundedSender<ChatEvent>,
    );
}
