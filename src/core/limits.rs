/*!
 * Limits and Constants
 *
 * Centralized location for defaults and thresholds used across collections,
 * primitives and resource locks.
 */

use std::time::Duration;

// =============================================================================
// COLLECTION LIMITS
// =============================================================================

/// Initial node arena reservation for list stores
/// [PERF] Avoids the first few reallocations for small queues
pub const LIST_INITIAL_RESERVE: usize = 8;

/// Upper bound on eagerly reserved slots when a capacity is declared
/// Larger capacities grow on demand instead of reserving up front
pub const MAX_EAGER_RESERVE: usize = 1024;

// =============================================================================
// LOCK LIMITS
// =============================================================================

/// Default polling interval for process-external locks (50ms)
pub const DEFAULT_LOCK_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Polling interval used by `LockConfig::fast_poll` (5ms)
pub const FAST_LOCK_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Polling interval used by `LockConfig::slow_poll` (500ms)
pub const SLOW_LOCK_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Suffix appended to a path to build its lock file
pub const LOCK_FILE_SUFFIX: &str = "lock";

/// Environment variable overriding the lock polling interval (milliseconds)
pub const LOCK_POLL_ENV: &str = "WAITKIT_LOCK_POLL_MS";

// =============================================================================
// OBSERVABILITY
// =============================================================================

/// Environment variable enabling JSON trace output
pub const TRACE_JSON_ENV: &str = "WAITKIT_TRACE_JSON";

/// Default number of lines retained by an in-memory printer before old lines drop
pub const MEMORY_PRINTER_DEFAULT_LINES: usize = 4096;
