//! Session struct and conversation history management.

use std::sync::atomic::AtomicBool;

use crate::budget::ResponseBudget;
use crate::token_tracker::TokenTracker;
use crate::{Message, Role, SamplingParams};

/// Default number of retained exchange pairs.
const DEFAULT_MAX_HISTORY_TURNS: usize = 20;

/// A conversation session with bounded message history.
///
/// History holds user and assistant turns only, oldest first; the system
/// prompt is prepended at request time and never stored.
pub struct Session {
    /// Conversation history, oldest first.
    pub(super) messages: Vec<Message>,
    /// System prompt (one system turn at the head of every request).
    pub(super) system_prompt: Option<String>,
    /// Sampling controls passed through to the service.
    pub(super) sampling: SamplingParams,
    /// Retained exchange pairs; history is trimmed to `2 * N` turns.
    pub(super) max_history_turns: usize,
    /// Response token budgeting policy.
    pub(super) budget: ResponseBudget,
    /// Token usage tracker.
    pub(super) tracker: TokenTracker,
    /// Whether the session is currently processing a request.
    pub(super) busy: AtomicBool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            system_prompt: None,
            sampling: SamplingParams::default(),
            max_history_turns: DEFAULT_MAX_HISTORY_TURNS,
            budget: ResponseBudget::default(),
            tracker: TokenTracker::new(),
            busy: AtomicBool::new(false),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_max_history_turns(mut self, turns: usize) -> Self {
        self.max_history_turns = turns;
        self
    }

    pub fn with_budget(mut self, budget: ResponseBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Replace the system prompt for subsequent calls.
    pub fn set_system_prompt(&mut self, prompt: impl Into<String>) {
        self.system_prompt = Some(prompt.into());
    }

    /// Assemble the outbound sequence: one system turn, the retained
    /// history in original order, the new user turn last.
    pub(super) fn build_messages(&self, user_message: &str) -> Vec<Message> {
        let mut msgs = Vec::new();
        if let Some(ref system) = self.system_prompt {
            msgs.push(Message {
                role: Role::System,
                content: system.clone(),
            });
        }
        let skip = self
            .messages
            .len()
            .saturating_sub(2 * self.max_history_turns);
        msgs.extend(self.messages[skip..].iter().cloned());
        msgs.push(Message {
            role: Role::User,
            content: user_message.to_string(),
        });
        msgs
    }

    /// Evict the oldest turns until at most `2 * max_history_turns` remain.
    pub(super) fn truncate_history(&mut self) {
        let excess = self
            .messages
            .len()
            .saturating_sub(2 * self.max_history_turns);
        if excess > 0 {
            self.messages.drain(..excess);
        }
    }

    /// Get the full conversation history.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Get the token tracker.
    pub fn tracker(&self) -> &TokenTracker {
        &self.tracker
    }

    /// Clear conversation history.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Number of messages in history.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exchange(session: &mut Session, n: usize) {
        session.messages.push(Message {
            role: Role::User,
            content: format!("question {n}"),
        });
        session.messages.push(Message {
            role: Role::Assistant,
            content: format!("answer {n}"),
        });
    }

    #[test]
    fn outbound_starts_with_system_and_ends_with_user() {
        let mut session = Session::new()
            .with_system_prompt("You are terse.")
            .with_max_history_turns(2);
        exchange(&mut session, 1);

        let outbound = session.build_messages("next question");

        assert_eq!(outbound.len(), 4);
        assert_eq!(outbound[0].role, Role::System);
        assert_eq!(outbound[0].content, "You are terse.");
        assert_eq!(outbound.last().unwrap().role, Role::User);
        assert_eq!(outbound.last().unwrap().content, "next question");
        let system_turns = outbound.iter().filter(|m| m.role == Role::System).count();
        assert_eq!(system_turns, 1);
    }

    #[test]
    fn outbound_retains_only_trailing_exchanges() {
        let mut session = Session::new()
            .with_system_prompt("sys")
            .with_max_history_turns(1);
        exchange(&mut session, 1);
        exchange(&mut session, 2);
        exchange(&mut session, 3);

        let outbound = session.build_messages("next");

        // system + last exchange + new user turn
        assert_eq!(outbound.len(), 4);
        assert_eq!(outbound[1].content, "question 3");
        assert_eq!(outbound[2].content, "answer 3");
    }

    #[test]
    fn truncate_evicts_oldest_first() {
        let mut session = Session::new().with_max_history_turns(2);
        exchange(&mut session, 1);
        exchange(&mut session, 2);
        exchange(&mut session, 3);

        session.truncate_history();

        assert_eq!(session.message_count(), 4);
        assert_eq!(session.messages()[0].content, "question 2");
        assert_eq!(session.messages()[3].content, "answer 3");
    }

    #[test]
    fn set_system_prompt_replaces_between_calls() {
        let mut session = Session::new().with_system_prompt("first persona");
        session.set_system_prompt("second persona");

        let outbound = session.build_messages("hello");
        assert_eq!(outbound[0].content, "second persona");
    }

    #[test]
    fn clear_empties_history() {
        let mut session = Session::new();
        exchange(&mut session, 1);
        session.clear();
        assert_eq!(session.message_count(), 0);
    }
}
