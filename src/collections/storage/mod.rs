/*!
 * Storage Engines
 *
 * The two backing stores for the collection adapters:
 * - `ListStore`: doubly-linked list with positional splice
 * - `HeapStore`: binary heap ordered by a caller predicate
 *
 * Both enforce capacity, honour `CancelToken` in their `wait_` operations and
 * publish the new count on their `changes()` hub after every mutation that
 * changes it.
 */

mod binary_heap;
mod heap;
mod linked;
mod list;

pub use binary_heap::OrderFn;
pub use heap::HeapStore;
pub use list::{ListStore, END};
