/*!
 * Resource Locks
 *
 * Process-external exclusive locks implementing `Lockable`:
 * - `FileLock`: exclusive-create marker file next to the guarded path
 * - `UdpBindLock`: ownership of a bound UDP address
 *
 * Both poll while contended, at the interval given by `LockConfig`.
 */

mod config;
mod file_lock;
mod udp_bind_lock;

pub use config::LockConfig;
pub use file_lock::{lock_path_for, FileLock};
pub use udp_bind_lock::UdpBindLock;
