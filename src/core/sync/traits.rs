/*!
 * Synchronization Traits
 *
 * Capability contracts shared by the in-process primitives and the
 * process-external locks.
 *
 * Suspending methods return `BoxFuture` so the traits stay object-safe and
 * usable behind `Arc<dyn Lockable>`.
 */

use super::cancel::CancelToken;
use super::subscribable::{SubscribeOptions, Subscribable, Subscriber, Unsubscribe};
use crate::core::errors::{LockResult, WaitResult};
use futures::future::BoxFuture;

/// Exclusive access to a resource
///
/// `release` must pair with a successful `acquire`/`try_acquire`; releasing
/// an unheld lock fails with `LockError::NotAcquired`.
pub trait Lockable: Send + Sync {
    /// Suspend until the lock is obtained or `cancel` fires
    fn acquire<'a>(&'a self, cancel: Option<&'a CancelToken>) -> BoxFuture<'a, LockResult<()>>;

    /// Single non-suspending attempt; `Ok(false)` when contended
    fn try_acquire(&self) -> LockResult<bool>;

    fn release(&self) -> LockResult<()>;

    fn is_locked(&self) -> bool;
}

/// Suspend until a condition over `Target` holds
pub trait Waitable: Send + Sync {
    type Target: Send;

    /// Fails immediately with `WaitError::Cancelled` if `cancel` already fired
    fn wait<'a>(
        &'a self,
        target: Self::Target,
        cancel: Option<&'a CancelToken>,
    ) -> BoxFuture<'a, WaitResult<()>>;
}

/// Exposes a change-notification hub
pub trait Observable {
    type Event: 'static;

    fn subscribable(&self) -> &Subscribable<Self::Event>;

    fn subscribe(
        &self,
        callback: Subscriber<Self::Event>,
        options: SubscribeOptions,
    ) -> Option<Unsubscribe> {
        self.subscribable().subscribe(callback, options)
    }
}
