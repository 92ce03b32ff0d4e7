/*!
 * waitkit
 * Capacity-bounded, cancellable collections and async coordination primitives
 *
 * - `collections`: `Deque`, `Queue`, `Stack`, `PriorityQueue` over shared
 *   list and heap stores, each with waiting and non-waiting mutations
 * - `core::sync`: `Subscribable`, `Counter`, `Semaphore`, `Mutex`, `Signal`
 * - `locks`: cross-process `FileLock` and `UdpBindLock`
 * - `logging`, `lifecycle`, `monitoring`: printers, exit handling, tracing
 *
 * # Example
 *
 * ```
 * use waitkit::{CancelToken, Queue};
 *
 * # tokio_test::block_on(async {
 * let queue = Queue::with_capacity(1);
 * queue.enqueue("job").unwrap();
 * assert!(queue.enqueue("overflow").is_err());
 *
 * let token = CancelToken::new();
 * assert_eq!(queue.wait_dequeue(Some(&token)).await, Ok("job"));
 * # });
 * ```
 */

pub mod collections;
pub mod core;
pub mod lifecycle;
pub mod locks;
pub mod logging;
pub mod monitoring;

// Re-exports
pub use crate::collections::{
    Collection, Deque, PriorityQueue, Queue, QueueCollection, Stack, StackCollection,
};
pub use crate::core::errors::*;
pub use crate::core::sync::{
    CancelToken, Counter, Lockable, Mutex, MutexGuard, Observable, Semaphore, SemaphorePermit,
    Signal, SubscribeOptions, Subscribable, Subscriber, Unsubscribe, Waitable,
};
pub use crate::lifecycle::{ExitPhase, ExitRegistry, ExitReport, PidFile};
pub use crate::locks::{FileLock, LockConfig, UdpBindLock};
pub use crate::logging::{
    LineFormat, LogLevel, LogRecord, Logger, MemoryPrinter, Printer, TracingPrinter, WriterPrinter,
};
pub use crate::monitoring::init_tracing;
