/*!
 * Error Types
 * Centralized error handling with thiserror and miette diagnostics
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Collection result type
pub type CollectionResult<T> = Result<T, CollectionError>;

/// Lock result type
pub type LockResult<T> = Result<T, LockError>;

/// Wait result type
pub type WaitResult<T> = Result<T, WaitError>;

/// Printer result type
pub type PrinterResult<T> = Result<T, PrinterError>;

/// Lifecycle result type
pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Errors raised by bounded collections and their storage engines
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum CollectionError {
    #[error("Capacity exceeded: requested {requested}, available {available} of {capacity}")]
    #[diagnostic(
        code(collection::capacity_exceeded),
        help("Use the waiting variant to suspend until capacity frees up, or raise the capacity.")
    )]
    CapacityExceeded {
        requested: usize,
        available: usize,
        capacity: usize,
    },

    #[error("Index {index} out of bounds for length {len}")]
    #[diagnostic(
        code(collection::index_out_of_bounds),
        help("Negative indices count from the end; deletion needs an existing element.")
    )]
    IndexOutOfBounds { index: isize, len: usize },

    #[error("Operation cancelled")]
    #[diagnostic(
        code(collection::cancelled),
        help("The cancellation token fired before the operation could complete. No items were changed.")
    )]
    Cancelled,
}

/// Errors raised by lockable resources (mutex, semaphore, file and port locks)
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum LockError {
    #[error("Lock not acquired")]
    #[diagnostic(
        code(lock::not_acquired),
        help("release() was called without a prior successful acquire().")
    )]
    NotAcquired,

    #[error("Lock already released")]
    #[diagnostic(
        code(lock::already_released),
        help("Each acquisition may be released at most once.")
    )]
    AlreadyReleased,

    #[error("Acquire cancelled")]
    #[diagnostic(code(lock::cancelled))]
    Cancelled,

    #[error("Requested {requested} permits but capacity is {capacity}")]
    #[diagnostic(
        code(lock::exceeds_capacity),
        help("A request larger than the semaphore capacity can never be satisfied.")
    )]
    ExceedsCapacity { requested: usize, capacity: usize },

    #[error("I/O error: {0}")]
    #[diagnostic(code(lock::io))]
    Io(String),
}

impl From<std::io::Error> for LockError {
    fn from(err: std::io::Error) -> Self {
        LockError::Io(err.to_string())
    }
}

/// Errors raised by waitable primitives
#[derive(Error, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
pub enum WaitError {
    #[error("Wait was cancelled")]
    #[diagnostic(code(wait::cancelled))]
    Cancelled,
}

impl From<WaitError> for CollectionError {
    fn from(err: WaitError) -> Self {
        match err {
            WaitError::Cancelled => CollectionError::Cancelled,
        }
    }
}

impl From<WaitError> for LockError {
    fn from(err: WaitError) -> Self {
        match err {
            WaitError::Cancelled => LockError::Cancelled,
        }
    }
}

/// Errors raised by log printers
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum PrinterError {
    #[error("Printer is closed")]
    #[diagnostic(code(printer::closed), help("close() was already called on this printer."))]
    Closed,

    #[error("Printer I/O error: {0}")]
    #[diagnostic(code(printer::io))]
    Io(String),
}

impl From<std::io::Error> for PrinterError {
    fn from(err: std::io::Error) -> Self {
        PrinterError::Io(err.to_string())
    }
}

/// Errors raised by exit registries and PID files
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum LifecycleError {
    #[error("Exit handlers already ran")]
    #[diagnostic(
        code(lifecycle::already_ran),
        help("An exit registry runs its handlers once; register before calling run().")
    )]
    AlreadyRan,

    #[error("PID file {path} is held by running process {pid}")]
    #[diagnostic(code(lifecycle::pid_file_in_use))]
    PidFileInUse { path: String, pid: u32 },

    #[error("Lifecycle I/O error: {0}")]
    #[diagnostic(code(lifecycle::io))]
    Io(String),
}

impl From<std::io::Error> for LifecycleError {
    fn from(err: std::io::Error) -> Self {
        LifecycleError::Io(err.to_string())
    }
}

/// Unified error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    #[error("Collection error: {0}")]
    #[diagnostic(transparent)]
    Collection(#[from] CollectionError),

    #[error("Lock error: {0}")]
    #[diagnostic(transparent)]
    Lock(#[from] LockError),

    #[error("Wait error: {0}")]
    #[diagnostic(transparent)]
    Wait(#[from] WaitError),

    #[error("Printer error: {0}")]
    #[diagnostic(transparent)]
    Printer(#[from] PrinterError),

    #[error("Lifecycle error: {0}")]
    #[diagnostic(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("I/O error: {0}")]
    #[diagnostic(code(waitkit::io))]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error stems from a fired cancellation token
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Error::Collection(CollectionError::Cancelled)
                | Error::Lock(LockError::Cancelled)
                | Error::Wait(WaitError::Cancelled)
        )
    }
}
