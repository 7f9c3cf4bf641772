//! AI backend contract.

use anyhow::Result;
use async_trait::async_trait;
use shared::agent_api::{ChatMessage, StreamChunk};
use tokio::sync::mpsc::UnboundedSender;

/// The AI service the chat host talks to. Implementations live outside the
/// core (HTTP providers, local models, test scripts).
///
/// Contract: if the connection fails before any fragment is sent, return
/// `Err(...)`. Once streaming has started, failures go through
/// `StreamChunk::Error` and the method returns `Ok(())`.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Stream a completion for `messages` on `model`, sending non-empty
    /// text fragments through `tx` in arrival order, terminated by `Done`.
    async fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
        model: &str,
        tx: UnboundedSender<StreamChunk>,
    ) -> Result<()>;

    /// Generate an image for `prompt`; resolves to a resource URL.
    async fn generate_image(&self, prompt: &str) -> Result<String>;
}
