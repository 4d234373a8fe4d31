//! OpenAI client configuration.

use std::fmt;

use crate::ChatError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4-1106-preview";

/// OpenAI client configuration. The credential is owned by each instance,
/// so concurrent clients can carry different keys.
#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    /// API root; override for compatible gateways or test servers.
    pub base_url: String,
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create config from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, ChatError> {
        match std::env::var("OPENAI_API_KEY") {
            Ok(key) if !key.is_empty() => Ok(Self::new(key)),
            _ => Err(ChatError::Api(
                "OpenAI API not configured. Set OPENAI_API_KEY.".into(),
            )),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Context window of the configured model, in tokens. Used to seed a
    /// dynamic response budget. Unknown models get a conservative default.
    pub fn context_window(&self) -> usize {
        match self.model.as_str() {
            "gpt-4-1106-preview" | "gpt-4-turbo" | "gpt-4-turbo-preview" => 128_000,
            m if m.starts_with("gpt-4o") => 128_000,
            "gpt-4" => 8_192,
            m if m.starts_with("gpt-3.5-turbo") => 16_385,
            _ => 8_192,
        }
    }
}
