/*!
 * List Store
 *
 * Capacity-bounded linked-list storage shared by `Deque`, `Queue` and `Stack`.
 *
 * # Index Resolution
 *
 * Positions are `isize`. A negative start counts from the end and clamps at
 * zero. Deleting requires the resolved start to name an existing element,
 * otherwise `IndexOutOfBounds`; insert-only splices clamp into `[0, count]`
 * and never fail on bounds.
 *
 * # Waiting
 *
 * Every mutation that changes `count()` publishes the new count on the
 * store's hub. A waiter subscribes while still holding the store lock, so
 * the removal that frees capacity cannot slip past it.
 */

use super::linked::LinkedSeq;
use crate::core::errors::{CollectionError, CollectionResult};
use crate::core::limits::MAX_EAGER_RESERVE;
use crate::core::sync::{
    cancellable, check_cancelled, wake_on_publish, CancelToken, SubscribeOptions, Subscribable,
};
use parking_lot::Mutex;
use std::fmt;
use tracing::trace;

/// Start position meaning "after the last element"
pub const END: isize = isize::MAX;

/// Resolved splice range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SplicePlan {
    start: usize,
    delete: usize,
}

/// Resolve a possibly negative start against `len`
#[inline]
fn resolve_index(start: isize, len: usize) -> usize {
    if start < 0 {
        len.saturating_sub(start.unsigned_abs())
    } else {
        start as usize
    }
}

/// Linked-list storage engine with capacity enforcement
pub struct ListStore<T> {
    seq: Mutex<LinkedSeq<T>>,
    capacity: Option<usize>,
    changes: Subscribable<usize>,
}

impl<T: Send + 'static> ListStore<T> {
    /// Empty store; `None` capacity means unbounded
    pub fn new(capacity: Option<usize>) -> Self {
        let reserve = capacity.map_or(0, |c| c.min(MAX_EAGER_RESERVE));
        Self {
            seq: Mutex::new(LinkedSeq::with_reserve(reserve)),
            capacity,
            changes: Subscribable::new(),
        }
    }

    /// Store seeded from `items`
    ///
    /// Fails with `CapacityExceeded` if the items do not fit.
    pub fn from_items<I>(items: I, capacity: Option<usize>) -> CollectionResult<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let seq: LinkedSeq<T> = items.into_iter().collect();
        if let Some(cap) = capacity {
            if seq.len() > cap {
                return Err(CollectionError::CapacityExceeded {
                    requested: seq.len(),
                    available: cap,
                    capacity: cap,
                });
            }
        }

        Ok(Self {
            seq: Mutex::new(seq),
            capacity,
            changes: Subscribable::new(),
        })
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.seq.lock().len()
    }

    #[inline]
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.seq.lock().is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|cap| self.count() >= cap)
    }

    /// Hub receiving the new count after each change
    pub fn changes(&self) -> &Subscribable<usize> {
        &self.changes
    }

    fn plan(&self, len: usize, start: isize, delete: usize, insert: usize) -> CollectionResult<SplicePlan> {
        let resolved = resolve_index(start, len);

        if delete > 0 && resolved >= len {
            return Err(CollectionError::IndexOutOfBounds { index: start, len });
        }

        let start = resolved.min(len);
        let delete = delete.min(len - start);

        if let Some(cap) = self.capacity {
            let kept = len - delete;
            if kept + insert > cap {
                return Err(CollectionError::CapacityExceeded {
                    requested: insert,
                    available: cap.saturating_sub(kept),
                    capacity: cap,
                });
            }
        }

        Ok(SplicePlan { start, delete })
    }

    fn publish_if_changed(&self, before: usize, after: usize) {
        if before != after {
            trace!(count = after, "List store count changed");
            self.changes.publish(&after);
        }
    }

    /// Remove `delete_count` items at `start` and insert `items` there
    ///
    /// Returns the removed items in order. Never suspends.
    pub fn splice<I>(&self, start: isize, delete_count: usize, items: I) -> CollectionResult<Vec<T>>
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = items.into_iter().collect();

        let (removed, before, after) = {
            let mut seq = self.seq.lock();
            let before = seq.len();
            let plan = self.plan(before, start, delete_count, items.len())?;
            let removed = seq.splice_at(plan.start, plan.delete, items);
            (removed, before, seq.len())
        };

        self.publish_if_changed(before, after);
        Ok(removed)
    }

    /// Like `splice`, but suspends while the insertion would exceed capacity
    ///
    /// Fails with `Cancelled` (and no effect) if `cancel` fires first. A
    /// request that could never fit fails immediately with `CapacityExceeded`.
    pub async fn wait_splice<I>(
        &self,
        start: isize,
        delete_count: usize,
        items: I,
        cancel: Option<&CancelToken>,
    ) -> CollectionResult<Vec<T>>
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = items.into_iter().collect();
        check_cancelled(cancel)?;

        if let Some(cap) = self.capacity {
            if items.len() > cap {
                return Err(CollectionError::CapacityExceeded {
                    requested: items.len(),
                    available: cap,
                    capacity: cap,
                });
            }
        }

        loop {
            let (rx, handle) = {
                let mut seq = self.seq.lock();
                let before = seq.len();
                match self.plan(before, start, delete_count, items.len()) {
                    Ok(plan) => {
                        let removed = seq.splice_at(plan.start, plan.delete, items);
                        let after = seq.len();
                        drop(seq);
                        self.publish_if_changed(before, after);
                        return Ok(removed);
                    }
                    Err(CollectionError::CapacityExceeded { .. }) => {
                        let (callback, rx) = wake_on_publish();
                        let handle = self.changes.subscribe(callback, SubscribeOptions::once());
                        (rx, handle)
                    }
                    Err(e) => return Err(e),
                }
            };

            trace!(pending = items.len(), "List store full, waiting for capacity");
            if let Err(e) = cancellable(rx, cancel).await {
                if let Some(handle) = handle {
                    handle.unsubscribe();
                }
                return Err(e.into());
            }
        }
    }

    /// Remove the item at `index`, suspending while the store is empty
    pub async fn wait_remove_at(&self, index: isize, cancel: Option<&CancelToken>) -> CollectionResult<T> {
        check_cancelled(cancel)?;

        loop {
            let (rx, handle) = {
                let mut seq = self.seq.lock();
                let before = seq.len();
                if before > 0 {
                    let plan = self.plan(before, index, 1, 0)?;
                    let removed = seq.splice_at(plan.start, plan.delete, Vec::new());
                    let after = seq.len();
                    drop(seq);
                    self.publish_if_changed(before, after);
                    if let Some(value) = removed.into_iter().next() {
                        return Ok(value);
                    }
                    continue;
                }

                let (callback, rx) = wake_on_publish();
                let handle = self.changes.subscribe(callback, SubscribeOptions::once());
                (rx, handle)
            };

            if let Err(e) = cancellable(rx, cancel).await {
                if let Some(handle) = handle {
                    handle.unsubscribe();
                }
                return Err(e.into());
            }
        }
    }

    /// Apply `f` to the item at `index` (negative counts from the end)
    pub fn with_item<R>(&self, index: isize, f: impl FnOnce(&T) -> R) -> Option<R> {
        let seq = self.seq.lock();
        let resolved = if index < 0 {
            seq.len().checked_sub(index.unsigned_abs())?
        } else {
            index as usize
        };
        seq.get(resolved).map(f)
    }

    /// Remove every item matching `pred`
    pub fn remove<F>(&self, pred: F) -> Vec<T>
    where
        F: FnMut(&T) -> bool,
    {
        self.extract(pred, false)
    }

    /// Remove the first item matching `pred`
    pub fn remove_first<F>(&self, pred: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        self.extract(pred, true).into_iter().next()
    }

    fn extract<F>(&self, pred: F, first_only: bool) -> Vec<T>
    where
        F: FnMut(&T) -> bool,
    {
        let (removed, before, after) = {
            let mut seq = self.seq.lock();
            let before = seq.len();
            let removed = seq.extract_if(pred, first_only);
            (removed, before, seq.len())
        };
        self.publish_if_changed(before, after);
        removed
    }

    /// Replace matching values in place; returns how many were replaced
    pub fn replace<P, M>(&self, pred: P, mapper: M) -> usize
    where
        P: FnMut(&T) -> bool,
        M: FnMut(&T) -> T,
    {
        self.seq.lock().replace_if(pred, mapper, false)
    }

    /// Replace the first matching value in place
    pub fn replace_first<P, M>(&self, pred: P, mapper: M) -> bool
    where
        P: FnMut(&T) -> bool,
        M: FnMut(&T) -> T,
    {
        self.seq.lock().replace_if(pred, mapper, true) > 0
    }

    pub fn clear(&self) {
        let before = {
            let mut seq = self.seq.lock();
            let before = seq.len();
            seq.clear();
            before
        };
        self.publish_if_changed(before, 0);
    }
}

impl<T: Clone + Send + 'static> ListStore<T> {
    /// Snapshot of the items front to back
    pub fn to_vec(&self) -> Vec<T> {
        self.seq.lock().iter().cloned().collect()
    }

    /// Existing items followed by `extra`, without mutating the store
    pub fn concat<I>(&self, extra: I) -> impl Iterator<Item = T>
    where
        I: IntoIterator<Item = T>,
    {
        self.to_vec().into_iter().chain(extra)
    }

    /// Clone of the item at `index` (negative counts from the end)
    pub fn get(&self, index: isize) -> Option<T> {
        self.with_item(index, T::clone)
    }
}

impl<T> fmt::Debug for ListStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListStore")
            .field("count", &self.seq.lock().len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
