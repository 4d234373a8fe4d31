//! Session concurrency guards.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::ChatError;

/// Scope guard serializing the read-build-call-append cycle on a session.
///
/// Acquired at the top of `send_message` and released on drop, so the flag
/// clears even when the future is cancelled mid-request.
pub(crate) struct SendGuard<'a> {
    in_flight: &'a AtomicBool,
}

impl<'a> SendGuard<'a> {
    /// Claim the session for one request. Fails with `Busy` when another
    /// request is already in flight.
    pub(crate) fn acquire(in_flight: &'a AtomicBool) -> Result<Self, ChatError> {
        if in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(ChatError::Busy);
        }
        Ok(Self { in_flight })
    }
}

impl Drop for SendGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}
