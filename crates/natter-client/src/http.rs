//! HTTP implementation of the conversation store.
//!
//! Talks to the remote conversation service. Every operation is a single
//! request; there is no retry or backoff anywhere in this module.

use crate::store::ConversationStore;
use crate::stream::{ChatEvent, StreamDecoder};
use async_trait::async_trait;
use futures::StreamExt;
use natter_core::conversation::{ConversationId, ConversationSummary, Message};
use natter_core::{NatterError, Result};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

/// Store implementation backed by the conversation service's HTTP API.
#[derive(Clone)]
pub struct HttpConversationStore {
    client: Client,
    base_url: String,
}

impl HttpConversationStore {
    /// Creates a store for the service at `base_url` (trailing slash
    /// tolerated).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Reads the body of a non-success response into a status error.
    async fn status_error(response: Response) -> NatterError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "failed to read error body".to_string());
        let message = if body.trim().is_empty() {
            canonical_reason(status)
        } else {
            body
        };
        NatterError::status(status.as_u16(), message)
    }
}

fn canonical_reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("unknown status")
        .to_string()
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    conversation_id: &'a ConversationId,
}

#[derive(Serialize)]
struct RenameRequest<'a> {
    title: &'a str,
}

#[derive(Deserialize)]
struct LoadResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct AckResponse {
    success: bool,
}

#[async_trait]
impl ConversationStore for HttpConversationStore {
    async fn create(&self, title: &str) -> Result<ConversationSummary> {
        debug!(title, "creating conversation");
        let response = self
            .client
            .post(self.url("/new_conversation"))
            .form(&[("title", title)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }
        let created: ConversationSummary = response.json().await?;
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<ConversationSummary>> {
        let response = self.client.get(self.url("/conversations")).send().await?;
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }
        let summaries: Vec<ConversationSummary> = response.json().await?;
        Ok(summaries)
    }

    async fn load(&self, id: &ConversationId) -> Result<Vec<Message>> {
        debug!(%id, "loading conversation");
        let response = self
            .client
            .get(self.url(&format!("/get_conversation/{id}")))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }
        let loaded: LoadResponse = response.json().await?;
        if let Some(error) = loaded.error {
            return Err(NatterError::service(error));
        }
        Ok(loaded.messages)
    }

    async fn rename(&self, id: &ConversationId, title: &str) -> Result<()> {
        debug!(%id, title, "renaming conversation");
        let response = self
            .client
            .post(self.url(&format!("/update_conversation_title/{id}")))
            .json(&RenameRequest { title })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }
        let ack: AckResponse = response.json().await?;
        if !ack.success {
            return Err(NatterError::service("the service rejected the rename"));
        }
        Ok(())
    }

    async fn delete(&self, id: &ConversationId) -> Result<()> {
        debug!(%id, "deleting conversation");
        let response = self
            .client
            .delete(self.url(&format!("/delete_conversation/{id}")))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }
        let ack: AckResponse = response.json().await?;
        if !ack.success {
            return Err(NatterError::service("the service rejected the delete"));
        }
        Ok(())
    }

    async fn chat(
        &self,
        id: &ConversationId,
        message: &str,
        events: UnboundedSender<ChatEvent>,
    ) {
        let request = ChatRequest {
            message,
            conversation_id: id,
        };
        let response = match self
            .client
            .post(self.url("/chat"))
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!(%id, error = %err, "chat request failed");
                let _ = events.send(ChatEvent::Failed(err.into()));
                return;
            }
        };

        if !response.status().is_success() {
            let err = Self::status_error(response).await;
            warn!(%id, error = %err, "chat request rejected");
            let _ = events.send(ChatEvent::Failed(err));
            return;
        }

        let _ = events.send(ChatEvent::Opened);

        let mut decoder = StreamDecoder::new();
        let mut stream = response.bytes_stream();
        while let Some(item) = stream.next().await {
            match item {
                Ok(chunk) => {
                    let text = decoder.decode(&chunk);
                    if !text.is_empty() {
                        let _ = events.send(ChatEvent::Chunk(text));
                    }
                }
                Err(err) => {
                    warn!(%id, error = %err, "chat stream broke");
                    let _ = events.send(ChatEvent::Failed(err.into()));
                    return;
                }
            }
        }

        let tail = decoder.finish();
        if !tail.is_empty() {
            let _ = events.send(ChatEvent::Chunk(tail));
        }
        let _ = events.send(ChatEvent::Done);
    }
}
