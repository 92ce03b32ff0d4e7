/*!
 * Counter
 * Integer value that publishes every change and can be awaited
 */

use super::cancel::{cancellable, check_cancelled, CancelToken};
use super::subscribable::{wake_on_publish, SubscribeOptions, Subscribable};
use super::traits::{Observable, Waitable};
use crate::core::errors::WaitResult;
use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use tracing::trace;

/// Observable integer counter
#[derive(Debug)]
pub struct Counter {
    initial: i64,
    value: Mutex<i64>,
    events: Subscribable<i64>,
}

impl Counter {
    pub fn new(initial: i64) -> Self {
        Self {
            initial,
            value: Mutex::new(initial),
            events: Subscribable::new(),
        }
    }

    #[inline]
    pub fn value(&self) -> i64 {
        *self.value.lock()
    }

    pub fn increment(&self) -> i64 {
        self.add(1)
    }

    pub fn decrement(&self) -> i64 {
        self.add(-1)
    }

    /// Add `delta` (may be negative) and publish the new value
    ///
    /// Saturates at `i64::MIN` / `i64::MAX`.
    pub fn add(&self, delta: i64) -> i64 {
        self.update(|v| v.saturating_add(delta))
    }

    pub fn set(&self, value: i64) -> i64 {
        self.update(|_| value)
    }

    /// Return to the construction-time value
    pub fn reset(&self) -> i64 {
        let initial = self.initial;
        self.update(|_| initial)
    }

    fn update(&self, f: impl FnOnce(i64) -> i64) -> i64 {
        let value = {
            let mut guard = self.value.lock();
            *guard = f(*guard);
            *guard
        };
        trace!(value, "Counter updated");
        self.events.publish(&value);
        value
    }

    /// Suspend until the value equals `target`
    pub async fn wait_for(&self, target: i64, cancel: Option<&CancelToken>) -> WaitResult<()> {
        check_cancelled(cancel)?;

        loop {
            // Subscribe before checking so an update in between still wakes us
            let (callback, rx) = wake_on_publish();
            let handle = self.events.subscribe(callback, SubscribeOptions::once());

            if self.value() == target {
                if let Some(handle) = handle {
                    handle.unsubscribe();
                }
                return Ok(());
            }

            if let Err(e) = cancellable(rx, cancel).await {
                if let Some(handle) = handle {
                    handle.unsubscribe();
                }
                return Err(e);
            }
        }
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Observable for Counter {
    type Event = i64;

    fn subscribable(&self) -> &Subscribable<i64> {
        &self.events
    }
}

impl Waitable for Counter {
    type Target = i64;

    fn wait<'a>(&'a self, target: i64, cancel: Option<&'a CancelToken>) -> BoxFuture<'a, WaitResult<()>> {
        self.wait_for(target, cancel).boxed()
    }
}
