/*!
 * PID File
 *
 * Records the current process ID at a path and registers its own removal
 * with an `ExitRegistry` in the `Late` phase.
 */

use super::exit::{ExitPhase, ExitRegistry};
use crate::core::errors::{LifecycleError, LifecycleResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Priority of PID-file removal within the `Late` phase; runs after lock cleanup
const PID_FILE_EXIT_PRIORITY: i32 = -100;

/// File holding the current process ID
#[derive(Debug)]
pub struct PidFile {
    path: PathBuf,
    pid: u32,
    removed: Arc<AtomicBool>,
}

impl PidFile {
    /// Write the current PID to `path` and schedule its removal on `registry`
    ///
    /// Fails with `PidFileInUse` when the file already names another process.
    /// A file holding our own PID or no parseable PID is overwritten.
    pub fn create(path: impl AsRef<Path>, registry: &ExitRegistry) -> LifecycleResult<Self> {
        let path = path.as_ref().to_path_buf();
        let pid = std::process::id();

        if let Some(existing) = Self::read(&path)? {
            if existing != pid {
                return Err(LifecycleError::PidFileInUse {
                    path: path.display().to_string(),
                    pid: existing,
                });
            }
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, format!("{}\n", pid))?;
        debug!(path = %path.display(), pid, "PID file written");

        let removed = Arc::new(AtomicBool::new(false));
        let cleanup_path = path.clone();
        let cleanup_flag = removed.clone();
        registry.register(
            ExitPhase::Late,
            PID_FILE_EXIT_PRIORITY,
            format!("pid-file:{}", path.display()),
            move || {
                if let Err(e) = remove_once(&cleanup_path, &cleanup_flag) {
                    warn!(path = %cleanup_path.display(), error = %e, "Failed to remove PID file at exit");
                }
            },
        )?;

        Ok(Self { path, pid, removed })
    }

    /// PID recorded in the file at `path`, `None` if absent or unparseable
    pub fn read(path: impl AsRef<Path>) -> LifecycleResult<Option<u32>> {
        match fs::read_to_string(path.as_ref()) {
            Ok(contents) => Ok(contents.trim().parse().ok()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_removed(&self) -> bool {
        self.removed.load(Ordering::Acquire)
    }

    /// Delete the file now; the exit handler then does nothing
    pub fn remove(&self) -> LifecycleResult<()> {
        remove_once(&self.path, &self.removed)
    }
}

fn remove_once(path: &Path, removed: &AtomicBool) -> LifecycleResult<()> {
    if removed.swap(true, Ordering::AcqRel) {
        return Ok(());
    }
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "PID file removed");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
