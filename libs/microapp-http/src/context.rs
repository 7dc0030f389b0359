//! Per-call cancellation and deadline handling.

use crate::error::HttpError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation scope for one or more API calls.
///
/// Every call on [`crate::Client`] takes a `&CallContext`. Cancelling the
/// token or passing the deadline aborts the send and the body read, and the
/// call reports [`HttpError::Cancelled`] or [`HttpError::DeadlineExceeded`]
/// rather than whatever the interrupted transport produced.
///
/// Clones share the same token. Use [`CallContext::child`] for a scope that
/// can be cancelled on its own while still following its parent.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    token: CancellationToken,
    deadline: Option<Deadline>,
}

#[derive(Debug, Clone, Copy)]
struct Deadline {
    at: Instant,
    budget: Duration,
}

impl CallContext {
    /// A context that never ends on its own.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing token, so the caller's shutdown signal also stops API calls.
    #[must_use]
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Give the context a deadline `timeout` from now.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Deadline {
            at: Instant::now() + timeout,
            budget: timeout,
        });
        self
    }

    #[must_use]
    pub fn with_deadline(mut self, at: Instant) -> Self {
        self.deadline = Some(Deadline {
            at,
            budget: at.saturating_duration_since(Instant::now()),
        });
        self
    }

    /// Derived scope: cancelled with its parent, cancellable alone, same deadline.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline.map(|d| d.at)
    }

    /// Why the context has ended, or `None` while it is still live.
    #[must_use]
    pub fn err(&self) -> Option<HttpError> {
        if self.token.is_cancelled() {
            return Some(HttpError::Cancelled);
        }
        match self.deadline {
            Some(d) if Instant::now() >= d.at => Some(HttpError::DeadlineExceeded(d.budget)),
            _ => None,
        }
    }

    /// Resolves once the context is cancelled or its deadline passes.
    pub async fn done(&self) -> HttpError {
        match self.deadline {
            Some(d) => tokio::select! {
                biased;
                () = self.token.cancelled() => HttpError::Cancelled,
                () = tokio::time::sleep_until(d.at) => HttpError::DeadlineExceeded(d.budget),
            },
            None => {
                self.token.cancelled().await;
                HttpError::Cancelled
            }
        }
    }

    /// Drive `fut` until it finishes or the context ends.
    ///
    /// A failure that races with the context ending is reported as the
    /// context's reason, never as the underlying transport error.
    ///
    /// # Errors
    /// Returns the context's reason if it ends first, otherwise `fut`'s error.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, HttpError>
    where
        F: Future<Output = Result<T, HttpError>>,
    {
        tokio::select! {
            biased;
            reason = self.done() => Err(reason),
            result = fut => result.map_err(|err| self.err().unwrap_or(err)),
        }
    }
}
