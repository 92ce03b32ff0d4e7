/*!
 * Subscribable Hub
 *
 * Synchronous publish/subscribe with registration-order delivery.
 *
 * # Delivery
 *
 * `publish` snapshots the subscriber list, drops the internal lock and then
 * invokes each callback in registration order. Callbacks may therefore
 * subscribe or unsubscribe re-entrantly. A panicking subscriber is caught and
 * logged; the remaining subscribers are still notified.
 */

use parking_lot::Mutex;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::oneshot;
use tracing::error;

/// Subscriber callback
pub type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Options accepted by `Subscribable::subscribe`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscribeOptions {
    /// Remove the registration after its first delivery
    pub once: bool,
}

impl SubscribeOptions {
    pub const fn once() -> Self {
        Self { once: true }
    }
}

struct Entry<T> {
    id: u64,
    callback: Subscriber<T>,
    once: bool,
}

struct Hub<T> {
    entries: Mutex<Vec<Entry<T>>>,
    next_id: AtomicU64,
}

trait Detach: Send + Sync {
    fn detach(&self, id: u64) -> bool;
}

impl<T: 'static> Detach for Hub<T> {
    fn detach(&self, id: u64) -> bool {
        let mut entries = self.entries.lock();
        match entries.iter().position(|entry| entry.id == id) {
            Some(pos) => {
                entries.remove(pos);
                true
            }
            None => false,
        }
    }
}

/// Handle returned by a successful subscription
///
/// Dropping the handle keeps the subscription alive; call `unsubscribe` to
/// remove it. Outliving the hub is harmless.
pub struct Unsubscribe {
    id: u64,
    hub: Weak<dyn Detach>,
}

impl Unsubscribe {
    /// Remove the registration
    ///
    /// Returns `false` if it was already gone (a fired `once` subscription,
    /// a cleared hub, or a dropped hub).
    pub fn unsubscribe(self) -> bool {
        match self.hub.upgrade() {
            Some(hub) => hub.detach(self.id),
            None => false,
        }
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscribe").field("id", &self.id).finish()
    }
}

/// Publish/subscribe hub over values of type `T`
pub struct Subscribable<T> {
    hub: Arc<Hub<T>>,
}

impl<T: 'static> Subscribable<T> {
    pub fn new() -> Self {
        Self {
            hub: Arc::new(Hub {
                entries: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Register a callback
    ///
    /// Returns `None` if this exact callback (same `Arc`) is already
    /// registered; duplicate subscription is a no-op rather than an error.
    pub fn subscribe(
        &self,
        callback: Subscriber<T>,
        options: SubscribeOptions,
    ) -> Option<Unsubscribe> {
        let mut entries = self.hub.entries.lock();
        if entries
            .iter()
            .any(|entry| same_callback(&entry.callback, &callback))
        {
            return None;
        }

        let id = self.hub.next_id.fetch_add(1, Ordering::Relaxed);
        entries.push(Entry {
            id,
            callback,
            once: options.once,
        });

        let hub: Weak<dyn Detach> = Arc::downgrade(&self.hub) as Weak<dyn Detach>;
        Some(Unsubscribe { id, hub })
    }

    /// Deliver `value` to every current subscriber
    ///
    /// Returns the number of callbacks invoked.
    pub fn publish(&self, value: &T) -> usize {
        let snapshot: Vec<Subscriber<T>> = {
            let mut entries = self.hub.entries.lock();
            let snapshot = entries
                .iter()
                .map(|entry| entry.callback.clone())
                .collect();
            entries.retain(|entry| !entry.once);
            snapshot
        };

        for callback in &snapshot {
            let outcome = catch_unwind(AssertUnwindSafe(|| callback(value)));
            if let Err(panic) = outcome {
                error!(
                    panic = %panic_message(panic.as_ref()),
                    "Subscriber panicked during publish; continuing delivery"
                );
            }
        }

        snapshot.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.hub.entries.lock().len()
    }

    /// Drop every registration
    pub fn clear(&self) {
        self.hub.entries.lock().clear();
    }
}

impl<T: 'static> Default for Subscribable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Subscribable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribable")
            .field("subscribers", &self.hub.entries.lock().len())
            .finish()
    }
}

fn same_callback<T>(a: &Subscriber<T>, b: &Subscriber<T>) -> bool {
    // Compare data addresses only; vtable pointers are not unique
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

pub(crate) fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Build a callback that completes a oneshot on its first delivery
///
/// Used by waiters: subscribe with `once`, then await the receiver.
pub(crate) fn wake_on_publish<T: 'static>() -> (Subscriber<T>, oneshot::Receiver<()>) {
    let (tx, rx) = oneshot::channel();
    let slot = Mutex::new(Some(tx));
    let callback: Subscriber<T> = Arc::new(move |_: &T| {
        if let Some(tx) = slot.lock().take() {
            let _ = tx.send(());
        }
    });
    (callback, rx)
}
