//! Per-call cancellation and deadline.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::error::TransportError;

/// Carries a cancellation token and an optional deadline into an engine call.
///
/// The local engine completes in process and ignores both. The remote engine
/// aborts its in-flight request as soon as either fires.
///
/// ## Example
///
/// ```ignore
/// let ctx = CallContext::with_timeout(Duration::from_secs(5));
/// let token = ctx.cancellation_token().clone();
/// // token.cancel() from another task aborts the request.
/// let reports = engine.list(&ctx, &ListRequest::new()).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// No deadline; cancelled only through its token.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().deadline_at(Instant::now() + timeout)
    }

    pub fn with_cancellation(token: CancellationToken) -> Self {
        CallContext {
            cancel: token,
            deadline: None,
        }
    }

    pub fn deadline_at(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline; `Some(ZERO)` once it has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// The error the call should fail with right now, if any.
    pub fn check(&self) -> Result<(), TransportError> {
        if self.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        if self.remaining().is_some_and(|left| left.is_zero()) {
            return Err(TransportError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Resolves when the context is cancelled or its deadline passes.
    pub async fn done(&self) -> TransportError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                _ = self.cancel.cancelled() => TransportError::Cancelled,
                _ = tokio::time::sleep_until(deadline) => TransportError::DeadlineExceeded,
            },
            None => {
                self.cancel.cancelled().await;
                TransportError::Cancelled
            }
        }
    }
}
