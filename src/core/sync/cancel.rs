/*!
 * Cancellation Tokens
 *
 * Cooperative cancellation for every suspend-capable operation. A token is
 * checked before suspending and raced against the suspension point, so a
 * cancelled operation never leaves a partial effect behind.
 */

use crate::core::errors::{WaitError, WaitResult};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Shared cancellation token
///
/// Clones observe the same state; cancelling any clone cancels all of them.
///
/// # Example
///
/// ```
/// use waitkit::CancelToken;
///
/// let token = CancelToken::new();
/// let observer = token.clone();
/// token.cancel();
/// assert!(observer.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    state: Arc<CancelState>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the token, waking every task suspended on it
    ///
    /// Returns `false` if the token was already cancelled.
    pub fn cancel(&self) -> bool {
        if self.state.cancelled.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.state.notify.notify_waiters();
        true
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::Acquire)
    }

    /// Fail fast with `WaitError::Cancelled` if the token already fired
    #[inline]
    pub fn check(&self) -> WaitResult<()> {
        if self.is_cancelled() {
            Err(WaitError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Resolves once the token is cancelled
    pub async fn cancelled(&self) {
        loop {
            // Register before checking so a concurrent cancel() cannot slip between
            let notified = self.state.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Check an optional token without suspending
#[inline]
pub(crate) fn check_cancelled(cancel: Option<&CancelToken>) -> WaitResult<()> {
    match cancel {
        Some(token) => token.check(),
        None => Ok(()),
    }
}

/// Race a future against an optional cancellation token
///
/// Cancellation wins when both are ready at the same poll.
pub(crate) async fn cancellable<F>(future: F, cancel: Option<&CancelToken>) -> WaitResult<F::Output>
where
    F: Future,
{
    match cancel {
        None => Ok(future.await),
        Some(token) => {
            token.check()?;
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(WaitError::Cancelled),
                output = future => Ok(output),
            }
        }
    }
}
