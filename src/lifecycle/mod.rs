/*!
 * Lifecycle
 *
 * Process teardown without globals: an `ExitRegistry` is created by the
 * application and passed to whatever needs cleanup, such as `PidFile`.
 */

mod exit;
mod pid_file;

pub use exit::{ExitHandle, ExitPhase, ExitRegistry, ExitReport};
pub use pid_file::PidFile;
