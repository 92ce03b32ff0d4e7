/*!
 * Collections
 *
 * Capacity-bounded, waitable collections. One storage engine per shape
 * (`ListStore`, `HeapStore`) carries capacity, cancellation and change
 * notification; the adapters only choose which end they work on.
 *
 * | Adapter | Store | Insert | Remove |
 * |---|---|---|---|
 * | `Deque` | list | `push` / `unshift` | `pop` / `shift` |
 * | `Queue` | list | `enqueue` | `dequeue` |
 * | `Stack` | list | `push` | `pop` |
 * | `PriorityQueue` | heap | `insert` | `extract` |
 *
 * Removing from an empty collection yields `None`; every insert and removal
 * has a `wait_` counterpart that suspends instead.
 */

mod deque;
mod priority;
mod queue;
mod stack;
pub mod storage;
mod traits;

pub use deque::Deque;
pub use priority::{Prioritized, PriorityQueue};
pub use queue::Queue;
pub use stack::Stack;
pub use storage::{HeapStore, ListStore, OrderFn, END};
pub use traits::{Collection, QueueCollection, StackCollection};

use crate::core::errors::{CollectionError, CollectionResult};
use tracing::warn;

/// Single removed item, treating an empty collection as `None`
pub(crate) fn take_removed<T>(result: CollectionResult<Vec<T>>) -> Option<T> {
    match result {
        Ok(removed) => removed.into_iter().next(),
        Err(CollectionError::IndexOutOfBounds { .. }) => None,
        Err(e) => {
            warn!(error = %e, "Unexpected failure removing from collection");
            None
        }
    }
}
