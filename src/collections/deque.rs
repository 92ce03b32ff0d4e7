/*!
 * Deque
 * Double-ended queue over the list store
 */

use super::storage::{ListStore, END};
use super::take_removed;
use super::traits::{Collection, QueueCollection, StackCollection};
use crate::core::errors::CollectionResult;
use crate::core::sync::{CancelToken, Observable, Subscribable};
use futures::future::{BoxFuture, FutureExt};

/// Double-ended queue: `push`/`pop` at the back, `unshift`/`shift` at the front
#[derive(Debug)]
pub struct Deque<T> {
    store: ListStore<T>,
}

impl<T: Send + 'static> Deque<T> {
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

    /// Deque holding `items` front to back
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

    /// Append at the back
    pub fn push(&self, item: T) -> CollectionResult<()> {
        self.push_all([item])
    }

    /// Append every item at the back, or none if they do not all fit
    pub fn push_all<I>(&self, items: I) -> CollectionResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.store.splice(END, 0, items).map(drop)
    }

    /// Prepend at the front
    pub fn unshift(&self, item: T) -> CollectionResult<()> {
        self.unshift_all([item])
    }

    /// Prepend every item, keeping their relative order
    pub fn unshift_all<I>(&self, items: I) -> CollectionResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.store.splice(0, 0, items).map(drop)
    }

    /// Remove from the back; `None` when empty
    pub fn pop(&self) -> Option<T> {
        take_removed(self.store.splice(-1, 1, []))
    }

    /// Remove from the front; `None` when empty
    pub fn shift(&self) -> Option<T> {
        take_removed(self.store.splice(0, 1, []))
    }

    pub async fn wait_push(&self, item: T, cancel: Option<&CancelToken>) -> CollectionResult<()> {
        self.wait_push_all([item], cancel).await
    }

    pub async fn wait_push_all<I>(&self, items: I, cancel: Option<&CancelToken>) -> CollectionResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.store.wait_splice(END, 0, items, cancel).await.map(drop)
    }

    pub async fn wait_unshift(&self, item: T, cancel: Option<&CancelToken>) -> CollectionResult<()> {
        self.wait_unshift_all([item], cancel).await
    }

    pub async fn wait_unshift_all<I>(&self, items: I, cancel: Option<&CancelToken>) -> CollectionResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.store.wait_splice(0, 0, items, cancel).await.map(drop)
    }

    /// Remove from the back, suspending while empty
    pub async fn wait_pop(&self, cancel: Option<&CancelToken>) -> CollectionResult<T> {
        self.store.wait_remove_at(-1, cancel).await
    }

    /// Remove from the front, suspending while empty
    pub async fn wait_shift(&self, cancel: Option<&CancelToken>) -> CollectionResult<T> {
        self.store.wait_remove_at(0, cancel).await
    }

    /// Remove every item matching `pred`
    pub fn remove<F>(&self, pred: F) -> Vec<T>
    where
        F: FnMut(&T) -> bool,
    {
        self.store.remove(pred)
    }

    pub fn remove_first<F>(&self, pred: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        self.store.remove_first(pred)
    }

    /// Replace matching items in place; returns how many changed
    pub fn replace<P, M>(&self, pred: P, mapper: M) -> usize
    where
        P: FnMut(&T) -> bool,
        M: FnMut(&T) -> T,
    {
        self.store.replace(pred, mapper)
    }

    pub fn clear(&self) {
        self.store.clear();
    }
}

impl<T: Clone + Send + 'static> Deque<T> {
    pub fn front(&self) -> Option<T> {
        self.store.get(0)
    }

    pub fn back(&self) -> Option<T> {
        self.store.get(-1)
    }

    /// Items front to back
    pub fn to_vec(&self) -> Vec<T> {
        self.store.to_vec()
    }

    /// Items followed by `extra`, leaving the deque unchanged
    pub fn concat<I>(&self, extra: I) -> impl Iterator<Item = T>
    where
        I: IntoIterator<Item = T>,
    {
        self.store.concat(extra)
    }
}

impl<T: Send + 'static> Default for Deque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> Collection for Deque<T> {
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

impl<T: Clone + Send + 'static> QueueCollection for Deque<T> {
    type Item = T;

    fn enqueue(&self, item: T) -> CollectionResult<()> {
        Deque::push(self, item)
    }

    fn dequeue(&self) -> Option<T> {
        self.shift()
    }

    fn front(&self) -> Option<T> {
        Deque::front(self)
    }

    fn wait_enqueue<'a>(
        &'a self,
        item: T,
        cancel: Option<&'a CancelToken>,
    ) -> BoxFuture<'a, CollectionResult<()>> {
        Deque::wait_push(self, item, cancel).boxed()
    }

    fn wait_dequeue<'a>(&'a self, cancel: Option<&'a CancelToken>) -> BoxFuture<'a, CollectionResult<T>> {
        self.wait_shift(cancel).boxed()
    }
}

impl<T: Clone + Send + 'static> StackCollection for Deque<T> {
    type Item = T;

    fn push(&self, item: T) -> CollectionResult<()> {
        Deque::push(self, item)
    }

    fn pop(&self) -> Option<T> {
        Deque::pop(self)
    }

    fn top(&self) -> Option<T> {
        self.back()
    }

    fn wait_push<'a>(
        &'a self,
        item: T,
        cancel: Option<&'a CancelToken>,
    ) -> BoxFuture<'a, CollectionResult<()>> {
        Deque::wait_push(self, item, cancel).boxed()
    }

    fn wait_pop<'a>(&'a self, cancel: Option<&'a CancelToken>) -> BoxFuture<'a, CollectionResult<T>> {
        Deque::wait_pop(self, cancel).boxed()
    }
}

impl<T: Send + 'static> Observable for Deque<T> {
    /// Item count after each change
    type Event = usize;

    fn subscribable(&self) -> &Subscribable<usize> {
        self.store.changes()
    }
}
