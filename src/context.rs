//! Cancellation and deadline context for API calls.
//!
//! A [`RequestContext`] is bound to a client handle with
//! [`HarvestClient::with_context`](crate::HarvestClient::with_context).
//! Every request issued through that handle checks the context before it is
//! sent, and a transport failure that happens after the context is done is
//! reported as the cancellation instead of the raw transport error.
//!
//! Cancellation never aborts a request that is already in flight. A multi-page
//! traversal stops before issuing its next request.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::HarvestError;

/// Cancellation token plus optional deadline.
///
/// Cloning is cheap; clones observe the same token.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context that is never cancelled and has no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Expire the context `timeout` from now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Expire the context at `deadline`.
    ///
    /// An earlier deadline already set on the context wins.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        });
        self
    }

    /// The token callers can use to cancel this context.
    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Cancel the context.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// The deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline. `None` when there is no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Returns true once the context is cancelled or past its deadline.
    pub fn is_done(&self) -> bool {
        self.error().is_some()
    }

    /// The error describing why the context is done, if it is.
    pub fn error(&self) -> Option<HarvestError> {
        if self.cancel.is_cancelled() {
            return Some(HarvestError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(HarvestError::DeadlineExceeded),
            _ => None,
        }
    }
}
