/*!
 * Heap Store
 *
 * Capacity-bounded binary-heap storage behind `PriorityQueue`.
 *
 * Capacity and waiting semantics mirror `ListStore`: inserts that would
 * overflow fail (or suspend in the `wait_` variant), extraction from an empty
 * heap yields `None` (or suspends), and every count change is published.
 */

use super::binary_heap::{OrderFn, PredicateHeap};
use crate::core::errors::{CollectionError, CollectionResult};
use crate::core::sync::{
    cancellable, check_cancelled, wake_on_publish, CancelToken, SubscribeOptions, Subscribable,
};
use parking_lot::Mutex;
use std::fmt;
use tracing::trace;

/// Binary-heap storage engine with capacity enforcement
pub struct HeapStore<T> {
    heap: Mutex<PredicateHeap<T>>,
    capacity: Option<usize>,
    changes: Subscribable<usize>,
}

impl<T: Send + 'static> HeapStore<T> {
    /// Empty heap ordered by `is_item_ordered(a, b)` (true: `a` comes out first)
    pub fn new(capacity: Option<usize>, is_item_ordered: OrderFn<T>) -> Self {
        Self {
            heap: Mutex::new(PredicateHeap::new(is_item_ordered)),
            capacity,
            changes: Subscribable::new(),
        }
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.heap.lock().len()
    }

    #[inline]
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.heap.lock().is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|cap| self.count() >= cap)
    }

    /// Hub receiving the new count after each change
    pub fn changes(&self) -> &Subscribable<usize> {
        &self.changes
    }

    fn check_room(&self, len: usize, insert: usize) -> CollectionResult<()> {
        match self.capacity {
            Some(cap) if len + insert > cap => Err(CollectionError::CapacityExceeded {
                requested: insert,
                available: cap.saturating_sub(len),
                capacity: cap,
            }),
            _ => Ok(()),
        }
    }

    fn publish_if_changed(&self, before: usize, after: usize) {
        if before != after {
            trace!(count = after, "Heap store count changed");
            self.changes.publish(&after);
        }
    }

    /// Insert every item or none of them
    pub fn insert<I>(&self, items: I) -> CollectionResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = items.into_iter().collect();

        let (before, after) = {
            let mut heap = self.heap.lock();
            let before = heap.len();
            self.check_room(before, items.len())?;
            for item in items {
                heap.push(item);
            }
            (before, heap.len())
        };

        self.publish_if_changed(before, after);
        Ok(())
    }

    /// Like `insert`, but suspends until every item fits
    pub async fn wait_insert<I>(&self, items: I, cancel: Option<&CancelToken>) -> CollectionResult<()>
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
                let mut heap = self.heap.lock();
                let before = heap.len();
                if self.check_room(before, items.len()).is_ok() {
                    for item in items {
                        heap.push(item);
                    }
                    let after = heap.len();
                    drop(heap);
                    self.publish_if_changed(before, after);
                    return Ok(());
                }

                let (callback, rx) = wake_on_publish();
                let handle = self.changes.subscribe(callback, SubscribeOptions::once());
                (rx, handle)
            };

            trace!(pending = items.len(), "Heap store full, waiting for capacity");
            if let Err(e) = cancellable(rx, cancel).await {
                if let Some(handle) = handle {
                    handle.unsubscribe();
                }
                return Err(e.into());
            }
        }
    }

    /// Remove the root item
    pub fn extract(&self) -> Option<T> {
        let (value, before, after) = {
            let mut heap = self.heap.lock();
            let before = heap.len();
            let value = heap.pop();
            (value, before, heap.len())
        };
        self.publish_if_changed(before, after);
        value
    }

    /// Remove the root item, suspending while the heap is empty
    pub async fn wait_extract(&self, cancel: Option<&CancelToken>) -> CollectionResult<T> {
        check_cancelled(cancel)?;

        loop {
            let (rx, handle) = {
                let mut heap = self.heap.lock();
                let before = heap.len();
                if let Some(value) = heap.pop() {
                    let after = heap.len();
                    drop(heap);
                    self.publish_if_changed(before, after);
                    return Ok(value);
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

    /// Apply `f` to the root item without removing it
    pub fn with_root<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.heap.lock().peek().map(f)
    }

    /// Replace the first item matching `pred` and re-heapify around it
    pub fn replace<P, M>(&self, pred: P, mapper: M) -> bool
    where
        P: FnMut(&T) -> bool,
        M: FnOnce(&T) -> T,
    {
        self.heap.lock().replace_first(pred, mapper)
    }

    /// Remove the first item matching `pred`
    pub fn remove_first<P>(&self, pred: P) -> Option<T>
    where
        P: FnMut(&T) -> bool,
    {
        let (removed, before, after) = {
            let mut heap = self.heap.lock();
            let before = heap.len();
            let removed = heap.remove_first(pred);
            (removed, before, heap.len())
        };
        self.publish_if_changed(before, after);
        removed
    }

    pub fn clear(&self) {
        let before = {
            let mut heap = self.heap.lock();
            let before = heap.len();
            heap.clear();
            before
        };
        self.publish_if_changed(before, 0);
    }
}

impl<T: Clone + Send + 'static> HeapStore<T> {
    /// Clone of the root item
    pub fn root(&self) -> Option<T> {
        self.with_root(T::clone)
    }

    /// Snapshot in heap (array) order, not extraction order
    pub fn to_vec(&self) -> Vec<T> {
        self.heap.lock().iter().cloned().collect()
    }
}

impl<T> fmt::Debug for HeapStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeapStore")
            .field("count", &self.heap.lock().len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
