/*!
 * Exit Registry
 *
 * Explicit, injectable registry of teardown handlers.
 *
 * # Ordering
 *
 * `run` executes every handler exactly once: by phase (`Early`, `Normal`,
 * `Late`), then by descending priority, then in registration order. A
 * panicking handler is caught and reported; the rest still run.
 */

use crate::core::errors::{LifecycleError, LifecycleResult};
use crate::core::sync::panic_message;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, error, info};

/// Teardown phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitPhase {
    /// Stop accepting work
    Early,
    /// Flush and close application resources
    Normal,
    /// Remove process markers (PID files, lock files)
    Late,
}

type ExitHandler = Box<dyn FnOnce() + Send>;

struct Registration {
    id: u64,
    phase: ExitPhase,
    priority: i32,
    name: String,
    handler: ExitHandler,
}

struct Inner {
    entries: Mutex<Vec<Registration>>,
    next_id: AtomicU64,
    ran: AtomicBool,
}

/// Outcome of `ExitRegistry::run`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitReport {
    /// Names of handlers that returned normally, in execution order
    pub completed: Vec<String>,
    /// `(name, panic message)` of handlers that panicked
    pub failed: Vec<(String, String)>,
}

impl ExitReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Registry of teardown handlers
///
/// Clones share the same registrations.
#[derive(Clone)]
pub struct ExitRegistry {
    inner: Arc<Inner>,
}

impl ExitRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
                ran: AtomicBool::new(false),
            }),
        }
    }

    /// Register `handler`; higher `priority` runs earlier within a phase
    pub fn register<F>(
        &self,
        phase: ExitPhase,
        priority: i32,
        name: impl Into<String>,
        handler: F,
    ) -> LifecycleResult<ExitHandle>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut entries = self.inner.entries.lock();
        // Checked under the entries lock so nothing slips in after run() drained them
        if self.inner.ran.load(Ordering::Acquire) {
            return Err(LifecycleError::AlreadyRan);
        }

        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let name = name.into();
        debug!(id, ?phase, priority, name = %name, "Exit handler registered");
        entries.push(Registration {
            id,
            phase,
            priority,
            name,
            handler: Box::new(handler),
        });

        Ok(ExitHandle {
            id,
            registry: Arc::downgrade(&self.inner),
        })
    }

    /// Handlers waiting to run
    pub fn pending(&self) -> usize {
        self.inner.entries.lock().len()
    }

    pub fn has_run(&self) -> bool {
        self.inner.ran.load(Ordering::Acquire)
    }

    /// Execute every registered handler once
    ///
    /// Fails with `AlreadyRan` on a second call.
    pub fn run(&self) -> LifecycleResult<ExitReport> {
        let mut entries = {
            let mut entries = self.inner.entries.lock();
            if self.inner.ran.swap(true, Ordering::AcqRel) {
                return Err(LifecycleError::AlreadyRan);
            }
            std::mem::take(&mut *entries)
        };

        // Stable sort keeps registration order among equal keys
        entries.sort_by(|a, b| {
            a.phase
                .cmp(&b.phase)
                .then_with(|| b.priority.cmp(&a.priority))
                .then_with(|| a.id.cmp(&b.id))
        });

        info!(handlers = entries.len(), "Running exit handlers");
        let mut report = ExitReport::default();

        for entry in entries {
            let Registration { name, handler, phase, .. } = entry;
            match catch_unwind(AssertUnwindSafe(handler)) {
                Ok(()) => {
                    debug!(?phase, name = %name, "Exit handler completed");
                    report.completed.push(name);
                }
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    error!(?phase, name = %name, panic = %message, "Exit handler panicked");
                    report.failed.push((name, message));
                }
            }
        }

        Ok(report)
    }
}

impl Default for ExitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExitRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExitRegistry")
            .field("pending", &self.pending())
            .field("ran", &self.has_run())
            .finish()
    }
}

/// Handle to a registered exit handler
#[derive(Debug)]
pub struct ExitHandle {
    id: u64,
    registry: Weak<Inner>,
}

impl ExitHandle {
    /// Withdraw the handler before it runs
    ///
    /// Returns `false` once the registry has run or been dropped.
    pub fn cancel(self) -> bool {
        let Some(inner) = self.registry.upgrade() else {
            return false;
        };
        let mut entries = inner.entries.lock();
        match entries.iter().position(|entry| entry.id == self.id) {
            Some(pos) => {
                entries.remove(pos);
                true
            }
            None => false,
        }
    }
}
