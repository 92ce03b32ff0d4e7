/*!
 * Async Mutex
 * Single-permit semaphore exposed through the `Lockable` contract
 */

use super::cancel::CancelToken;
use super::semaphore::{Semaphore, SemaphorePermit};
use super::subscribable::Subscribable;
use super::traits::{Lockable, Observable};
use crate::core::errors::{LockError, LockResult};
use futures::future::{BoxFuture, FutureExt};
use tracing::debug;

/// RAII guard returned by `Mutex::lock`
pub type MutexGuard = SemaphorePermit;

/// Async mutual-exclusion lock
///
/// Two usage styles are supported:
/// - `lock()` returns a guard that unlocks on drop;
/// - the `Lockable` methods (`acquire`/`release`) track the holder inside the
///   mutex, for callers that release from a different scope than they acquire.
#[derive(Debug)]
pub struct Mutex {
    semaphore: Semaphore,
    held: parking_lot::Mutex<Option<SemaphorePermit>>,
}

impl Mutex {
    pub fn new() -> Self {
        Self {
            semaphore: Semaphore::new(1),
            held: parking_lot::Mutex::new(None),
        }
    }

    /// Whether the single permit is taken
    #[inline]
    pub fn locked(&self) -> bool {
        self.semaphore.available() == 0
    }

    /// Suspend until the lock is free and return a guard
    pub async fn lock(&self, cancel: Option<&CancelToken>) -> LockResult<MutexGuard> {
        self.semaphore.acquire(1, cancel).await
    }

    pub fn try_lock(&self) -> Option<MutexGuard> {
        // A single permit can never exceed capacity
        self.semaphore.try_acquire(1).ok().flatten()
    }

    async fn acquire_tracked(&self, cancel: Option<&CancelToken>) -> LockResult<()> {
        let permit = self.semaphore.acquire(1, cancel).await?;
        *self.held.lock() = Some(permit);
        debug!("Mutex acquired");
        Ok(())
    }
}

impl Default for Mutex {
    fn default() -> Self {
        Self::new()
    }
}

impl Lockable for Mutex {
    fn acquire<'a>(&'a self, cancel: Option<&'a CancelToken>) -> BoxFuture<'a, LockResult<()>> {
        self.acquire_tracked(cancel).boxed()
    }

    fn try_acquire(&self) -> LockResult<bool> {
        match self.semaphore.try_acquire(1)? {
            Some(permit) => {
                *self.held.lock() = Some(permit);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn release(&self) -> LockResult<()> {
        let permit = self.held.lock().take().ok_or(LockError::NotAcquired)?;
        debug!("Mutex released");
        permit.release()
    }

    fn is_locked(&self) -> bool {
        self.locked()
    }
}

impl Observable for Mutex {
    /// Permits available (0 = locked, 1 = unlocked)
    type Event = usize;

    fn subscribable(&self) -> &Subscribable<usize> {
        self.semaphore.subscribable()
    }
}
