//! Async send path for `Session`.

use std::time::Instant;

use tracing::{debug, warn};

use crate::{ChatClient, ChatError, Message, Role};

use super::manager::Session;
use super::types::SendGuard;

impl Session {
    /// Send a user message and return the assistant's reply.
    ///
    /// History is updated only after a successful response: the user turn
    /// and the reply are appended together, then the retention bound is
    /// re-applied. Any failure leaves the history exactly as it was, so
    /// transport errors are safe to retry with the identical call.
    pub async fn send_message(
        &mut self,
        client: &dyn ChatClient,
        user_message: impl Into<String>,
    ) -> Result<String, ChatError> {
        let _guard = SendGuard::acquire(&self.busy)?;

        let user_message = user_message.into();
        let outbound = self.build_messages(&user_message);
        let max_tokens = self.budget.response_ceiling(&outbound)?;

        let started = Instant::now();
        let completion = client
            .complete(&outbound, &self.sampling, max_tokens)
            .await?;
        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            max_tokens, "completion round trip"
        );

        if completion.usage.total_tokens() == 0 {
            warn!("no usage data in completion response");
        }
        self.tracker.record(&completion.usage);

        let content = completion.content.trim().to_string();
        self.messages.push(Message {
            role: Role::User,
            content: user_message,
        });
        self.messages.push(Message {
            role: Role::Assistant,
            content: content.clone(),
        });
        // Re-apply the retention bound via disjoint field borrows so the
        // still-held `SendGuard` (which borrows `self.busy`) does not clash
        // with a whole-`&mut self` method call. Logic mirrors
        // `Session::truncate_history`.
        let excess = self
            .messages
            .len()
            .saturating_sub(2 * self.max_history_turns);
        if excess > 0 {
            self.messages.drain(..excess);
        }

        Ok(content)
    }
}
