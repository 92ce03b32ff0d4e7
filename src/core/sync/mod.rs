/*!
 * Synchronization Primitives
 *
 * Async, cancellable primitives shared by the collections and by callers:
 * - `Subscribable`: synchronous publish/subscribe hub
 * - `Counter`: observable integer that can be awaited
 * - `Semaphore` / `Mutex`: counted and exclusive permits with FIFO waiters
 * - `Signal`: manual- or auto-reset event
 *
 * # Contracts
 *
 * - `Lockable`: acquire/release of exclusive resources
 * - `Waitable`: suspend until a condition holds, honouring `CancelToken`
 * - `Observable`: exposes a change-notification hub
 *
 * All suspension is cooperative (futures); the non-waiting variants never
 * suspend. Internal locks are never held across `.await` or while publishing.
 */

mod cancel;
mod counter;
mod mutex;
mod semaphore;
mod signal;
mod subscribable;
mod traits;

pub use cancel::CancelToken;
pub use counter::Counter;
pub use mutex::{Mutex, MutexGuard};
pub use semaphore::{Semaphore, SemaphorePermit};
pub use signal::Signal;
pub use subscribable::{SubscribeOptions, Subscribable, Subscriber, Unsubscribe};
pub use traits::{Lockable, Observable, Waitable};

pub(crate) use cancel::{cancellable, check_cancelled};
pub(crate) use subscribable::{panic_message, wake_on_publish};
