/*!
 * Collection Traits
 *
 * Capability views shared by the adapters. Each adapter implements only the
 * views that match its semantics; `Deque` implements both queue and stack.
 */

use crate::core::errors::CollectionResult;
use crate::core::sync::CancelToken;
use futures::future::BoxFuture;

/// Sized, bounded container
pub trait Collection: Send + Sync {
    fn count(&self) -> usize;

    /// `None` means unbounded
    fn capacity(&self) -> Option<usize>;

    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    fn is_full(&self) -> bool {
        self.capacity().is_some_and(|cap| self.count() >= cap)
    }

    fn clear(&self);
}

/// First-in first-out view
pub trait QueueCollection: Collection {
    type Item: Send + 'static;

    /// Fails with `CapacityExceeded` when full
    fn enqueue(&self, item: Self::Item) -> CollectionResult<()>;

    /// `None` when empty
    fn dequeue(&self) -> Option<Self::Item>;

    fn front(&self) -> Option<Self::Item>;

    fn wait_enqueue<'a>(
        &'a self,
        item: Self::Item,
        cancel: Option<&'a CancelToken>,
    ) -> BoxFuture<'a, CollectionResult<()>>;

    fn wait_dequeue<'a>(
        &'a self,
        cancel: Option<&'a CancelToken>,
    ) -> BoxFuture<'a, CollectionResult<Self::Item>>;
}

/// Last-in first-out view
pub trait StackCollection: Collection {
    type Item: Send + 'static;

    fn push(&self, item: Self::Item) -> CollectionResult<()>;

    fn pop(&self) -> Option<Self::Item>;

    fn top(&self) -> Option<Self::Item>;

    fn wait_push<'a>(
        &'a self,
        item: Self::Item,
        cancel: Option<&'a CancelToken>,
    ) -> BoxFuture<'a, CollectionResult<()>>;

    fn wait_pop<'a>(
        &'a self,
        cancel: Option<&'a CancelToken>,
    ) -> BoxFuture<'a, CollectionResult<Self::Item>>;
}
