/*!
 * Queue
 * First-in first-out adapter over the list store
 */

use super::storage::{ListStore, END};
use super::take_removed;
use super::traits::{Collection, QueueCollection};
use crate::core::errors::CollectionResult;
use crate::core::sync::{CancelToken, Observable, Subscribable};
use futures::future::{BoxFuture, FutureExt};

/// FIFO queue: enqueue at the back, dequeue from the front
#[derive(Debug)]
pub struct Queue<T> {
    store: ListStore<T>,
}

impl<T: Send + 'static> Queue<T> {
    pub fn new() -> Self {
        Self {
            store: ListStore::new(None),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            store: ListStore::new(Some(capacity)),
        }
    }

    /// Queue whose front is the first of `items`
    pub fn from_items<I>(items: I, capacity: Option<usize>) -> CollectionResult<Self>
    where
        I: IntoIterator<Item = T>,
    {
        Ok(Self {
            store: ListStore::from_items(items, capacity)?,
        })
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.store.count()
    }

    #[inline]
    pub fn capacity(&self) -> Option<usize> {
        self.store.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.store.is_full()
    }

    pub fn enqueue(&self, item: T) -> CollectionResult<()> {
        self.enqueue_all([item])
    }

    /// Enqueue every item in order, or none if they do not all fit
    pub fn enqueue_all<I>(&self, items: I) -> CollectionResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.store.splice(END, 0, items).map(drop)
    }

    /// `None` when empty
    pub fn dequeue(&self) -> Option<T> {
        take_removed(self.store.splice(0, 1, []))
    }

    pub async fn wait_enqueue(&self, item: T, cancel: Option<&CancelToken>) -> CollectionResult<()> {
        self.wait_enqueue_all([item], cancel).await
    }

    pub async fn wait_enqueue_all<I>(&self, items: I, cancel: Option<&CancelToken>) -> CollectionResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.store.wait_splice(END, 0, items, cancel).await.map(drop)
    }

    pub async fn wait_dequeue(&self, cancel: Option<&CancelToken>) -> CollectionResult<T> {
        self.store.wait_remove_at(0, cancel).await
    }

    pub fn remove<F>(&self, pred: F) -> Vec<T>
    where
        F: FnMut(&T) -> bool,
    {
        self.store.remove(pred)
    }

    pub fn clear(&self) {
        self.store.clear();
    }
}

impl<T: Clone + Send + 'static> Queue<T> {
    pub fn front(&self) -> Option<T> {
        self.store.get(0)
    }

    /// Items in dequeue order
    pub fn to_vec(&self) -> Vec<T> {
        self.store.to_vec()
    }
}

impl<T: Send + 'static> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> Collection for Queue<T> {
    fn count(&self) -> usize {
        self.store.count()
    }

    fn capacity(&self) -> Option<usize> {
        self.store.capacity()
    }

    fn clear(&self) {
        self.store.clear();
    }
}

impl<T: Clone + Send + 'static> QueueCollection for Queue<T> {
    type Item = T;

    fn enqueue(&self, item: T) -> CollectionResult<()> {
        Queue::enqueue(self, item)
    }

    fn dequeue(&self) -> Option<T> {
        Queue::dequeue(self)
    }

    fn front(&self) -> Option<T> {
        Queue::front(self)
    }

    fn wait_enqueue<'a>(
        &'a self,
        item: T,
        cancel: Option<&'a CancelToken>,
    ) -> BoxFuture<'a, CollectionResult<()>> {
        Queue::wait_enqueue(self, item, cancel).boxed()
    }

    fn wait_dequeue<'a>(&'a self, cancel: Option<&'a CancelToken>) -> BoxFuture<'a, CollectionResult<T>> {
        Queue::wait_dequeue(self, cancel).boxed()
    }
}

impl<T: Send + 'static> Observable for Queue<T> {
    type Event = usize;

    fn subscribable(&self) -> &Subscribable<usize> {
        self.store.changes()
    }
}
