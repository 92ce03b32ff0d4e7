/*!
 * Priority Queue
 *
 * Items paired with a priority, held in the heap store. The comparator
 * `ordered(a, b)` returns true when priority `a` must come out before `b`;
 * the default `a < b` makes lower numbers more urgent. Equal priorities come
 * out in insertion order.
 */

use super::storage::{HeapStore, OrderFn};
use super::traits::Collection;
use crate::core::errors::CollectionResult;
use crate::core::sync::{CancelToken, Observable, Subscribable};
use std::sync::Arc;

/// Item stored alongside its priority
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prioritized<T, P> {
    pub item: T,
    pub priority: P,
}

/// Capacity-bounded priority queue
#[derive(Debug)]
pub struct PriorityQueue<T, P> {
    store: HeapStore<Prioritized<T, P>>,
}

fn entry_order<T, P>(ordered: Arc<dyn Fn(&P, &P) -> bool + Send + Sync>) -> OrderFn<Prioritized<T, P>>
where
    T: 'static,
    P: 'static,
{
    Arc::new(move |a: &Prioritized<T, P>, b: &Prioritized<T, P>| ordered(&a.priority, &b.priority))
}

impl<T, P> PriorityQueue<T, P>
where
    T: Send + 'static,
    P: PartialOrd + Send + 'static,
{
    /// Unbounded queue; lower priority values come out first
    pub fn new() -> Self {
        Self::with_comparator(None, |a: &P, b: &P| a < b)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_comparator(Some(capacity), |a: &P, b: &P| a < b)
    }

    /// Queue seeded from `(item, priority)` pairs
    pub fn from_entries<I>(entries: I, capacity: Option<usize>) -> CollectionResult<Self>
    where
        I: IntoIterator<Item = (T, P)>,
    {
        let queue = Self::with_comparator(capacity, |a: &P, b: &P| a < b);
        queue.store.insert(
            entries
                .into_iter()
                .map(|(item, priority)| Prioritized { item, priority }),
        )?;
        Ok(queue)
    }
}

impl<T, P> PriorityQueue<T, P>
where
    T: Send + 'static,
    P: Send + 'static,
{
    /// Queue ordered by a custom priority predicate
    pub fn with_comparator<F>(capacity: Option<usize>, ordered: F) -> Self
    where
        F: Fn(&P, &P) -> bool + Send + Sync + 'static,
    {
        Self {
            store: HeapStore::new(capacity, entry_order(Arc::new(ordered))),
        }
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

    /// Insert a single item
    pub fn push(&self, item: T, priority: P) -> CollectionResult<()> {
        self.store.insert([Prioritized { item, priority }])
    }

    /// Remove the most urgent item; `None` when empty
    pub fn extract(&self) -> Option<T> {
        self.store.extract().map(|entry| entry.item)
    }

    /// Remove the most urgent item together with its priority
    pub fn extract_entry(&self) -> Option<(T, P)> {
        self.store.extract().map(|entry| (entry.item, entry.priority))
    }

    pub async fn wait_extract(&self, cancel: Option<&CancelToken>) -> CollectionResult<T> {
        self.store.wait_extract(cancel).await.map(|entry| entry.item)
    }

    /// Remove the first item matching `pred`, regardless of priority
    pub fn remove_first<F>(&self, mut pred: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        self.store
            .remove_first(|entry| pred(&entry.item))
            .map(|entry| entry.item)
    }

    pub fn clear(&self) {
        self.store.clear();
    }
}

impl<T, P> PriorityQueue<T, P>
where
    T: Send + 'static,
    P: Clone + Send + 'static,
{
    /// Insert every item at `priority`, or none if they do not all fit
    pub fn insert<I>(&self, priority: P, items: I) -> CollectionResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.store.insert(items.into_iter().map(|item| Prioritized {
            item,
            priority: priority.clone(),
        }))
    }

    /// Like `insert`, but suspends until every item fits
    pub async fn wait_insert<I>(&self, priority: P, items: I, cancel: Option<&CancelToken>) -> CollectionResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        let entries: Vec<_> = items
            .into_iter()
            .map(|item| Prioritized {
                item,
                priority: priority.clone(),
            })
            .collect();
        self.store.wait_insert(entries, cancel).await
    }

    /// Priority of the most urgent item
    pub fn peek_priority(&self) -> Option<P> {
        self.store.with_root(|entry| entry.priority.clone())
    }
}

impl<T, P> PriorityQueue<T, P>
where
    T: Clone + Send + 'static,
    P: Send + 'static,
{
    /// Most urgent item, left in place
    pub fn peek(&self) -> Option<T> {
        self.store.with_root(|entry| entry.item.clone())
    }
}

impl<T, P> PriorityQueue<T, P>
where
    T: Clone + PartialEq + Send + 'static,
    P: Clone + Send + 'static,
{
    /// Move the first item equal to `item` to `priority`
    ///
    /// Returns `false` when no such item is queued.
    pub fn set_priority(&self, item: &T, priority: P) -> bool {
        self.store.replace(
            |entry| entry.item == *item,
            |entry| Prioritized {
                item: entry.item.clone(),
                priority,
            },
        )
    }

    /// Entries in heap order (not extraction order)
    pub fn to_vec(&self) -> Vec<Prioritized<T, P>> {
        self.store.to_vec()
    }
}

impl<T, P> Default for PriorityQueue<T, P>
where
    T: Send + 'static,
    P: PartialOrd + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P> Collection for PriorityQueue<T, P>
where
    T: Send + 'static,
    P: Send + 'static,
{
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

impl<T, P> Observable for PriorityQueue<T, P>
where
    T: Send + 'static,
    P: Send + 'static,
{
    type Event = usize;

    fn subscribable(&self) -> &Subscribable<usize> {
        self.store.changes()
    }
}
