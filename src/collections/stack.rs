/*!
 * Stack
 * Last-in first-out adapter; the top is the end of the list store
 */

use super::storage::{ListStore, END};
use super::take_removed;
use super::traits::{Collection, StackCollection};
use crate::core::errors::CollectionResult;
use crate::core::sync::{CancelToken, Observable, Subscribable};
use futures::future::{BoxFuture, FutureExt};

#[derive(Debug)]
pub struct Stack<T> {
    store: ListStore<T>,
}

impl<T: Send + 'static> Stack<T> {
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

    /// Stack whose top is the last of `items`
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

    pub fn push(&self, item: T) -> CollectionResult<()> {
        self.push_all([item])
    }

    /// Push every item in order (the last ends on top), or none
    pub fn push_all<I>(&self, items: I) -> CollectionResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.store.splice(END, 0, items).map(drop)
    }

    /// `None` when empty
    pub fn pop(&self) -> Option<T> {
        take_removed(self.store.splice(-1, 1, []))
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

    pub async fn wait_pop(&self, cancel: Option<&CancelToken>) -> CollectionResult<T> {
        self.store.wait_remove_at(-1, cancel).await
    }

    pub fn clear(&self) {
        self.store.clear();
    }
}

impl<T: Clone + Send + 'static> Stack<T> {
    pub fn top(&self) -> Option<T> {
        self.store.get(-1)
    }

    /// Items bottom to top
    pub fn to_vec(&self) -> Vec<T> {
        self.store.to_vec()
    }
}

impl<T: Send + 'static> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> Collection for Stack<T> {
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

impl<T: Clone + Send + 'static> StackCollection for Stack<T> {
    type Item = T;

    fn push(&self, item: T) -> CollectionResult<()> {
        Stack::push(self, item)
    }

    fn pop(&self) -> Option<T> {
        Stack::pop(self)
    }

    fn top(&self) -> Option<T> {
        Stack::top(self)
    }

    fn wait_push<'a>(
        &'a self,
        item: T,
        cancel: Option<&'a CancelToken>,
    ) -> BoxFuture<'a, CollectionResult<()>> {
        Stack::wait_push(self, item, cancel).boxed()
    }

    fn wait_pop<'a>(&'a self, cancel: Option<&'a CancelToken>) -> BoxFuture<'a, CollectionResult<T>> {
        Stack::wait_pop(self, cancel).boxed()
    }
}

impl<T: Send + 'static> Observable for Stack<T> {
    type Event = usize;

    fn subscribable(&self) -> &Subscribable<usize> {
        self.store.changes()
    }
}
