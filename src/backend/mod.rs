//! Completion backend trait and normalized request/response types.
//!
//! The [`CompletionBackend`] trait is the seam between the generator and the
//! generative-AI service. Requests carry only what the pipeline needs:
//! model, chat messages, token limit and temperature.
//!
//! ```text
//! EnrichmentGenerator ──► CompletionRequest ──► CompletionBackend::complete() ──► CompletionResponse
//!                                                       │
//!                                          ┌────────────┴────────────┐
//!                                    OpenAiBackend               MockBackend
//!                                 /v1/chat/completions        scripted outcomes
//! ```

pub mod mock;
pub mod openai;

pub use mock::MockBackend;
pub use openai::OpenAiBackend;

use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;

/// A normalized chat-completion request.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    /// Model identifier (e.g. `"gpt-3.5-turbo"`).
    pub model: String,

    /// Conversation, system message first.
    pub messages: Vec<ChatMessage>,

    /// Maximum tokens to generate.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f64,
}

/// A single message in a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    /// The role of the message author.
    pub role: Role,
    /// The message content.
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// The role of a chat message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions.
    System,
    /// User input.
    User,
    /// Assistant (model) response.
    Assistant,
}

/// A normalized completion response.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// `choices[0].message.content` — expected to hold a JSON payload.
    pub text: String,

    /// HTTP status code (for diagnostics/logging).
    pub status: u16,
}

/// Abstraction over generative-AI providers.
///
/// Implementations must be safe to share across concurrent calls; the
/// generator holds one as `Arc<dyn CompletionBackend>`.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Execute one completion call. No retry happens here.
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse>;

    /// Human-readable name for logging and diagnostics.
    fn name(&self) -> &'static str;
}
