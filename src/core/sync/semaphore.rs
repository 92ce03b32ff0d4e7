/*!
 * Semaphore
 *
 * Counted permit pool with FIFO waiters.
 *
 * # Fairness
 *
 * Waiters are served strictly in arrival order: a request that cannot be
 * satisfied blocks every later request, even smaller ones.
 *
 * # Cancellation
 *
 * A cancelled acquire leaves the pool untouched. If permits were granted in
 * the same instant the token fired, they are handed back before `Cancelled`
 * is returned.
 */

use super::cancel::{cancellable, CancelToken};
use super::subscribable::Subscribable;
use super::traits::Observable;
use crate::core::errors::{LockError, LockResult, WaitError};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::debug;

struct Waiter {
    id: u64,
    permits: usize,
    tx: oneshot::Sender<()>,
}

struct PoolState {
    available: usize,
    waiters: VecDeque<Waiter>,
    next_id: u64,
}

impl PoolState {
    /// Hand permits to queued waiters in FIFO order
    fn grant(&mut self) {
        while let Some(front) = self.waiters.front() {
            if front.tx.is_closed() {
                // Acquire future dropped without a token
                self.waiters.pop_front();
                continue;
            }
            if front.permits > self.available {
                break;
            }
            if let Some(waiter) = self.waiters.pop_front() {
                self.available -= waiter.permits;
                if waiter.tx.send(()).is_err() {
                    self.available += waiter.permits;
                }
            }
        }
    }
}

struct Pool {
    capacity: usize,
    state: Mutex<PoolState>,
    events: Subscribable<usize>,
}

impl Pool {
    fn release(&self, permits: usize) {
        let available = {
            let mut state = self.state.lock();
            state.available += permits;
            state.grant();
            state.available
        };
        self.events.publish(&available);
    }
}

/// Counted semaphore
///
/// Cloning shares the same pool.
#[derive(Clone)]
pub struct Semaphore {
    pool: Arc<Pool>,
}

impl Semaphore {
    pub fn new(capacity: usize) -> Self {
        Self {
            pool: Arc::new(Pool {
                capacity,
                state: Mutex::new(PoolState {
                    available: capacity,
                    waiters: VecDeque::new(),
                    next_id: 0,
                }),
                events: Subscribable::new(),
            }),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.pool.capacity
    }

    /// Permits currently free
    pub fn available(&self) -> usize {
        self.pool.state.lock().available
    }

    /// Number of suspended acquirers
    pub fn waiting(&self) -> usize {
        self.pool.state.lock().waiters.len()
    }

    fn check_request(&self, permits: usize) -> LockResult<()> {
        if permits > self.pool.capacity {
            return Err(LockError::ExceedsCapacity {
                requested: permits,
                capacity: self.pool.capacity,
            });
        }
        Ok(())
    }

    fn permit(&self, permits: usize) -> SemaphorePermit {
        SemaphorePermit {
            pool: self.pool.clone(),
            permits,
            released: AtomicBool::new(false),
        }
    }

    /// Take `permits` without suspending
    ///
    /// Returns `Ok(None)` if they are not available or other acquirers are
    /// already queued.
    pub fn try_acquire(&self, permits: usize) -> LockResult<Option<SemaphorePermit>> {
        self.check_request(permits)?;

        let available = {
            let mut state = self.pool.state.lock();
            if !state.waiters.is_empty() || state.available < permits {
                return Ok(None);
            }
            state.available -= permits;
            state.available
        };
        self.pool.events.publish(&available);
        Ok(Some(self.permit(permits)))
    }

    /// Take `permits`, suspending until they are available or `cancel` fires
    pub async fn acquire(
        &self,
        permits: usize,
        cancel: Option<&CancelToken>,
    ) -> LockResult<SemaphorePermit> {
        self.check_request(permits)?;
        if let Some(token) = cancel {
            token.check()?;
        }

        let (id, mut rx) = {
            let mut state = self.pool.state.lock();
            if state.waiters.is_empty() && state.available >= permits {
                state.available -= permits;
                let available = state.available;
                drop(state);
                self.pool.events.publish(&available);
                return Ok(self.permit(permits));
            }

            let (tx, rx) = oneshot::channel();
            let id = state.next_id;
            state.next_id += 1;
            state.waiters.push_back(Waiter { id, permits, tx });
            debug!(
                permits,
                queued = state.waiters.len(),
                "Semaphore contended, queuing acquirer"
            );
            (id, rx)
        };

        // Dropped before `rx`, so a grant racing with cancellation is still visible
        let mut pending = PendingAcquire {
            pool: &self.pool,
            id,
            permits,
            settled: false,
        };

        match cancellable(&mut rx, cancel).await {
            Ok(Ok(())) => {
                pending.settled = true;
                Ok(self.permit(permits))
            }
            // Sender is only dropped by grant() after a closed receiver
            Ok(Err(_)) => {
                pending.settled = true;
                Err(LockError::Cancelled)
            }
            Err(WaitError::Cancelled) => Err(LockError::Cancelled),
        }
    }
}

/// Queued acquire that has not resolved yet
///
/// Dropping it unresolved (token fired or future dropped) withdraws the
/// request, or hands back permits that were granted in the meantime.
struct PendingAcquire<'a> {
    pool: &'a Pool,
    id: u64,
    permits: usize,
    settled: bool,
}

impl Drop for PendingAcquire<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        let granted = {
            let mut state = self.pool.state.lock();
            match state.waiters.iter().position(|w| w.id == self.id) {
                Some(pos) => {
                    state.waiters.remove(pos);
                    // A blocked head may have been holding back smaller requests
                    state.grant();
                    false
                }
                None => true,
            }
        };

        if granted {
            debug!(
                permits = self.permits,
                "Returning permits granted to a cancelled acquirer"
            );
            self.pool.release(self.permits);
        }
    }
}

impl Observable for Semaphore {
    /// Permits available after each change
    type Event = usize;

    fn subscribable(&self) -> &Subscribable<usize> {
        &self.pool.events
    }
}

impl fmt::Debug for Semaphore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.pool.state.lock();
        f.debug_struct("Semaphore")
            .field("capacity", &self.pool.capacity)
            .field("available", &state.available)
            .field("waiting", &state.waiters.len())
            .finish()
    }
}

/// Permits held from a `Semaphore`
///
/// Released explicitly via `release` or implicitly on drop.
pub struct SemaphorePermit {
    pool: Arc<Pool>,
    permits: usize,
    released: AtomicBool,
}

impl SemaphorePermit {
    #[inline]
    pub fn permits(&self) -> usize {
        self.permits
    }

    #[inline]
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Return the permits to the pool
    ///
    /// A second call fails with `LockError::AlreadyReleased`.
    pub fn release(&self) -> LockResult<()> {
        if self.released.swap(true, Ordering::AcqRel) {
            return Err(LockError::AlreadyReleased);
        }
        self.pool.release(self.permits);
        Ok(())
    }
}

impl Drop for SemaphorePermit {
    fn drop(&mut self) {
        if !self.released.swap(true, Ordering::AcqRel) {
            self.pool.release(self.permits);
        }
    }
}

impl fmt::Debug for SemaphorePermit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SemaphorePermit")
            .field("permits", &self.permits)
            .field("released", &self.is_released())
            .finish()
    }
}
