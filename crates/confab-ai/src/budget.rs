//! Response token budgeting.
//!
//! The completion service bills prompt and response against one shared
//! context window. A session either reserves a fixed, model-specific
//! response ceiling, or counts the prompt tokens and hands whatever is
//! left of the window to the response.

use crate::{ChatError, Message};

/// Estimates how many tokens a string occupies under the target model's
/// tokenization scheme.
///
/// Counts only need to track the service's own accounting closely enough
/// that a computed budget does not itself trigger an overflow rejection;
/// exact parity is a known approximation, not a requirement.
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

/// Rule-of-thumb counter: one token per four characters, rounded up.
pub struct HeuristicCounter;

impl TokenCounter for HeuristicCounter {
    fn count(&self, text: &str) -> usize {
        text.chars().count().div_ceil(4)
    }
}

/// Tokens held back from the window so the computed budget does not brush
/// against the service's own accounting.
pub const DEFAULT_SAFETY_MARGIN: usize = 100;

/// Response ceiling used when no budget is configured.
pub const DEFAULT_RESPONSE_CEILING: u32 = 4096;

/// Policy for the `max_tokens` value sent with each request.
pub enum ResponseBudget {
    /// Fixed, model-specific response ceiling.
    Fixed(u32),
    /// Count prompt tokens and give the rest of the context window to the
    /// response, minus a safety margin.
    Dynamic {
        context_limit: usize,
        safety_margin: usize,
        counter: Box<dyn TokenCounter>,
    },
}

impl ResponseBudget {
    /// Dynamic budget with the heuristic counter and default margin.
    pub fn dynamic(context_limit: usize) -> Self {
        Self::Dynamic {
            context_limit,
            safety_margin: DEFAULT_SAFETY_MARGIN,
            counter: Box::new(HeuristicCounter),
        }
    }

    /// Resolve the response ceiling for an outbound message sequence.
    ///
    /// Fails with `ContextOverflow` when the prompt plus safety margin
    /// leaves no room for a response; nothing is sent in that case.
    pub fn response_ceiling(&self, messages: &[Message]) -> Result<u32, ChatError> {
        match self {
            Self::Fixed(max_tokens) => Ok(*max_tokens),
            Self::Dynamic {
                context_limit,
                safety_margin,
                counter,
            } => {
                let prompt_tokens: usize =
                    messages.iter().map(|m| counter.count(&m.content)).sum();
                let used = prompt_tokens + safety_margin;
                if used >= *context_limit {
                    return Err(ChatError::ContextOverflow {
                        prompt_tokens,
                        context_limit: *context_limit,
                    });
                }
                Ok((*context_limit - used) as u32)
            }
        }
    }
}

impl Default for ResponseBudget {
    fn default() -> Self {
        Self::Fixed(DEFAULT_RESPONSE_CEILING)
    }
}
