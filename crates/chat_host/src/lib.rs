//! Turn orchestration for the chat client.
//!
//! Glue between the classifier, the markdown renderer and an AI backend:
//! classify the prompt, open a stream on the selected model, re-render the
//! growing response after every fragment, then finalize with an
//! HTML-preview pass.

mod backend;

pub use backend::ChatBackend;

use anyhow::Result;
use classifier::{classify, ClassificationResult};
use futures::future::{AbortHandle, Abortable, Aborted};
use markdown::{extract_html_document, parse_blocks, Block};
use parking_lot::Mutex;
use shared::agent_api::{ChatMessage, StreamChunk};
use shared::task::TaskCategory;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

/// System prompt sent ahead of every streamed conversation.
const SYSTEM_PROMPT: &str = "You are Chorus, a multi-capability AI assistant. \
You speak naturally, helpfully, and engagingly.\n\n\
When responding:\n\
1. Start with a short 1-2 line summary of what you are doing.\n\
2. Use rich markdown formatting: headings, bullet points, numbered lists, \
tables, and code blocks where relevant.\n\
3. End every response with a \"**What to do next?**\" section giving 2-3 \
suggestions.\n\n\
Always wrap code in fenced blocks with language identifiers. For HTML apps \
and games, generate complete, self-contained HTML files with all CSS and \
JavaScript inline.";

/// Progress notifications emitted while a turn runs.
#[derive(Debug, Clone)]
pub enum TurnEvent {
    Classified(ClassificationResult),
    /// Fresh parse of the whole response buffer after a fragment arrived.
    Rendered(Vec<Block>),
    ImageGenerated { url: String },
}

/// Final state of a completed turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub classification: ClassificationResult,
    pub text: String,
    pub image_url: Option<String>,
    pub html_preview: Option<String>,
}

/// Runs user turns against a backend. One streaming request is outstanding
/// at a time; starting a new turn aborts the previous one so render events
/// for a stale buffer stop immediately.
pub struct ChatHost {
    backend: Arc<dyn ChatBackend>,
    active: Mutex<Option<AbortHandle>>,
}

impl ChatHost {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            active: Mutex::new(None),
        }
    }

    /// Abort the in-flight turn, if any.
    pub fn cancel_active(&self) {
        if let Some(handle) = self.active.lock().take() {
            handle.abort();
        }
    }

    /// Run one user turn. `history` is the prior conversation without the
    /// system message; `events` receives progress while the turn runs.
    pub async fn run_turn(
        &self,
        history: &[ChatMessage],
        user_text: &str,
        has_image: bool,
        events: UnboundedSender<TurnEvent>,
    ) -> Result<TurnOutcome> {
        let classification = classify(user_text, has_image);
        tracing::debug!(
            "classified message as {} -> {}",
            classification.category.as_str(),
            classification.model
        );
        let _ = events.send(TurnEvent::Classified(classification.clone()));

        self.cancel_active();
        let (abort_handle, abort_reg) = AbortHandle::new_pair();
        *self.active.lock() = Some(abort_handle);

        let turn = self.drive_turn(history, user_text, &classification, &events);
        let outcome = match Abortable::new(turn, abort_reg).await {
            Ok(outcome) => outcome?,
            Err(Aborted) => {
                tracing::debug!("turn aborted before completion");
                anyhow::bail!("turn aborted");
            }
        };

        *self.active.lock() = None;
        Ok(outcome)
    }

    async fn drive_turn(
        &self,
        history: &[ChatMessage],
        user_text: &str,
        classification: &ClassificationResult,
        events: &UnboundedSender<TurnEvent>,
    ) -> Result<TurnOutcome> {
        if classification.category == TaskCategory::ImageGen {
            let url = self.backend.generate_image(user_text).await?;
            let text = format!("Here's your generated image based on: \"{user_text}\"");
            let _ = events.send(TurnEvent::ImageGenerated { url: url.clone() });
            let _ = events.send(TurnEvent::Rendered(parse_blocks(&text)));
            return Ok(TurnOutcome {
                classification: classification.clone(),
                text,
                image_url: Some(url),
                html_preview: None,
            });
        }

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: SYSTEM_PROMPT.to_string(),
        });
        messages.extend_from_slice(history);
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: user_text.to_string(),
        });

        let (chunk_tx, mut chunk_rx) = unbounded_channel::<StreamChunk>();
        let backend = Arc::clone(&self.backend);
        let model = classification.model.to_string();
        let stream_task =
            tokio::spawn(async move { backend.stream_chat(messages, &model, chunk_tx).await });

        let mut buffer = String::new();
        while let Some(chunk) = chunk_rx.recv().await {
            match chunk {
                StreamChunk::Text(fragment) => {
                    buffer.push_str(&fragment);
                    // Full re-parse of the buffer on every fragment; the
                    // renderer keeps no state between calls.
                    let _ = events.send(TurnEvent::Rendered(parse_blocks(&buffer)));
                }
                StreamChunk::Done { .. } => break,
                StreamChunk::Error(message) => {
                    tracing::warn!("stream error after start: {message}");
                    buffer = inline_error(&message);
                    let _ = events.send(TurnEvent::Rendered(parse_blocks(&buffer)));
                    break;
                }
            }
        }

        // A connection failure before any fragment surfaces as an Err from
        // the backend future; fold it into the same inline-error shape.
        if let Ok(Err(e)) = stream_task.await {
            if buffer.is_empty() {
                tracing::warn!("stream failed to start: {e}");
                buffer = inline_error(&e.to_string());
                let _ = events.send(TurnEvent::Rendered(parse_blocks(&buffer)));
            }
        }

        let html_preview = match classification.category {
            TaskCategory::AppBuild | TaskCategory::GameBuild => extract_html_document(&buffer),
            _ => None,
        };

        Ok(TurnOutcome {
            classification: classification.clone(),
            text: buffer,
            image_url: None,
            html_preview,
        })
    }
}

fn inline_error(message: &str) -> String {
    format!("I encountered an error: {message}\n\nPlease try again or rephrase your request.")
}
