//! ChatClient trait implementation for OpenAiClient.

use async_trait::async_trait;
use tracing::debug;

use crate::{ChatClient, ChatError, Completion, Message, SamplingParams};

use super::client::OpenAiClient;

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn complete(
        &self,
        messages: &[Message],
        sampling: &SamplingParams,
        max_tokens: u32,
    ) -> Result<Completion, ChatError> {
        let body = self.build_request_body(messages, sampling, max_tokens);

        debug!(model = %self.config.model, max_tokens, "chat completion request");

        let response = self
            .http
            .post(self.chat_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChatError::Timeout
                } else {
                    ChatError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ChatError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = text.chars().take(200).collect::<String>();
            let detail = format!("HTTP {status}: {text}");
            return Err(if status.is_client_error() {
                ChatError::Rejected(detail)
            } else {
                ChatError::Api(detail)
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ChatError::Parse(e.to_string()))?;

        self.parse_response(json)
    }
}
