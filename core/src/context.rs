//! Per-call cancellation and deadline.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use crate::transport::TransportError;

/// Cancellation signal and optional deadline carried by every call.
///
/// Cloning a `Context` shares its token, so cancelling any clone cancels all
/// of them.
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Observe an existing cancellation token.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// A timeout too large to represent as an instant leaves the deadline
    /// unchanged.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Set a deadline. An earlier deadline already on the context is kept.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        });
        self
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The reason this context is done, or `None` while it is still live.
    pub fn err(&self) -> Option<TransportError> {
        if self.token.is_cancelled() {
            return Some(TransportError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(TransportError::DeadlineExceeded),
            _ => None,
        }
    }

    async fn done(&self) -> TransportError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                _ = self.token.cancelled() => TransportError::Cancelled,
                _ = sleep_until(deadline) => TransportError::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                TransportError::Cancelled
            }
        }
    }

    /// Drive `fut` until it completes or the context is done, whichever comes
    /// first. `fut` is dropped unfinished in the latter case.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, TransportError> {
        if let Some(err) = self.err() {
            return Err(err);
        }
        tokio::select! {
            biased;
            err = self.done() => Err(err),
            out = fut => Ok(out),
        }
    }
}
