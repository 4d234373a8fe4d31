//! Chat-completion sessions for OpenAI-compatible APIs.
//!
//! Provides a conversation `Session` with:
//! - Bounded message history (FIFO truncation by exchange count)
//! - Response token budgeting (fixed ceiling or token-counted)
//! - Per-instance API credentials and usage tracking
//! - Typed errors separating rejected requests from transport failures

pub mod budget;
pub mod openai;
pub mod session;
pub mod token_tracker;

use async_trait::async_trait;

pub use budget::{HeuristicCounter, ResponseBudget, TokenCounter};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use session::Session;
pub use token_tracker::TokenTracker;

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(
        &self,
        messages: &[Message],
        sampling: &SamplingParams,
        max_tokens: u32,
    ) -> Result<Completion, ChatError>;
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Sampling controls passed through unmodified to the completion service.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SamplingParams {
    pub temperature: f64,
    pub top_p: f64,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 1.0,
        }
    }
}

/// A completed (non-streamed) response from the service.
#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("context overflow: prompt is {prompt_tokens} tokens against a {context_limit}-token window")]
    ContextOverflow {
        prompt_tokens: usize,
        context_limit: usize,
    },
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("rate limited")]
    RateLimited,
    #[error("API error: {0}")]
    Api(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("timeout")]
    Timeout,
    #[error("parse error: {0}")]
    Parse(String),
    #[error("session is busy with another request")]
    Busy,
}

impl ChatError {
    /// True for transport failures, where retrying the identical call is safe.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout)
    }
}
