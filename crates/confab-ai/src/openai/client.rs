//! OpenAI client struct, request building, and response parsing.

use crate::{ChatError, Completion, Message, Role, SamplingParams, TokenUsage};

use super::config::OpenAiConfig;

/// OpenAI-compatible Chat Completions client.
pub struct OpenAiClient {
    pub(crate) config: OpenAiConfig,
    pub(crate) http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    /// Chat Completions endpoint under the configured API root.
    pub(crate) fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Build the JSON request body for the Chat Completions API.
    pub(crate) fn build_request_body(
        &self,
        messages: &[Message],
        sampling: &SamplingParams,
        max_tokens: u32,
    ) -> serde_json::Value {
        let msgs: Vec<_> = messages
            .iter()
            .map(|msg| {
                let role = match msg.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                };
                serde_json::json!({
                    "role": role,
                    "content": msg.content,
                })
            })
            .collect();

        serde_json::json!({
            "model": self.config.model,
            "messages": msgs,
            "temperature": sampling.temperature,
            "top_p": sampling.top_p,
            "max_tokens": max_tokens,
        })
    }

    /// Parse a Chat Completions response body.
    pub(crate) fn parse_response(&self, json: serde_json::Value) -> Result<Completion, ChatError> {
        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| ChatError::Parse("no message content in response".into()))?
            .to_string();

        let usage = TokenUsage {
            input_tokens: json["usage"]["prompt_tokens"].as_u64().unwrap_or(0),
            output_tokens: json["usage"]["completion_tokens"].as_u64().unwrap_or(0),
        };

        Ok(Completion { content, usage })
    }
}
