//! Caller-controlled cancellation for operation waits

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reason {
    Cancelled,
    DeadlineExceeded,
}

impl From<Reason> for CoreError {
    fn from(reason: Reason) -> Self {
        match reason {
            Reason::Cancelled => CoreError::Cancelled,
            Reason::DeadlineExceeded => CoreError::DeadlineExceeded,
        }
    }
}

/// Cancellation signal plus optional deadline for a wait
///
/// Cloning shares the token: cancelling any clone cancels them all.
///
/// The first cause to fire is recorded and reported from then on, so a
/// context whose deadline passed before [`cancel`](Self::cancel) was called
/// keeps reporting [`CoreError::DeadlineExceeded`].
#[derive(Debug, Clone, Default)]
pub struct WaitContext {
    token: CancellationToken,
    deadline: Option<Instant>,
    reason: Arc<OnceLock<Reason>>,
}

impl WaitContext {
    /// A context that is only cancelled explicitly
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing token, e.g. a child of a shutdown token
    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            token,
            ..Self::default()
        }
    }

    /// Give up once `timeout` has elapsed from now
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Give up at `deadline`; an earlier existing deadline is kept
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        // Clones without this deadline must not see it recorded
        let reason = OnceLock::new();
        if let Some(existing) = self.reason.get() {
            let _ = reason.set(*existing);
        }
        self.reason = Arc::new(reason);
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancel the context unless it already ended
    pub fn cancel(&self) {
        self.observe();
        let _ = self.reason.set(Reason::Cancelled);
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.observe().is_some()
    }

    /// Why the context ended, or `None` while it is live
    pub fn error(&self) -> Option<CoreError> {
        self.observe().map(CoreError::from)
    }

    /// Resolves with the reason once the context is cancelled or its deadline passes
    pub async fn done(&self) -> CoreError {
        if let Some(reason) = self.observe() {
            return reason.into();
        }

        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.token.cancelled() => {}
                _ = tokio::time::sleep_until(deadline) => {}
            },
            None => self.token.cancelled().await,
        }

        self.observe().unwrap_or(Reason::Cancelled).into()
    }

    /// Record the first cause that has fired, if any
    fn observe(&self) -> Option<Reason> {
        if let Some(reason) = self.reason.get() {
            return Some(*reason);
        }
        let fired = if self.deadline.is_some_and(|d| Instant::now() >= d) {
            Reason::DeadlineExceeded
        } else if self.token.is_cancelled() {
            Reason::Cancelled
        } else {
            return None;
        };
        Some(*self.reason.get_or_init(|| fired))
    }
}
