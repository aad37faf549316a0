//! Conversation store proxy: typed HTTP access to the remote
//! conversation service, plus streaming chat support.

pub mod http;
pub mod store;
pub mod stream;

pub use http::HttpConversationStore;
pub use store::ConversationStore;
pub use stream::{ChatEvent, StreamDecoder};
