/*!
 * File Lock
 *
 * Cross-process exclusive lock backed by a `<path>.lock` marker file.
 *
 * The marker is created with exclusive-create semantics, so exactly one
 * creator wins; it holds the owner's PID. Contended acquisition polls at
 * `LockConfig::poll_interval`. Releasing (or dropping a held lock) deletes
 * the marker.
 */

use super::config::LockConfig;
use crate::core::errors::{LockError, LockResult};
use crate::core::limits::LOCK_FILE_SUFFIX;
use crate::core::sync::{cancellable, check_cancelled, CancelToken, Lockable};
use futures::future::{BoxFuture, FutureExt};
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, trace, warn};

/// Lock file path for `target`: the target path with `.lock` appended
pub fn lock_path_for(target: &Path) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push(".");
    name.push(LOCK_FILE_SUFFIX);
    PathBuf::from(name)
}

/// Exclusive lock on a filesystem path
#[derive(Debug)]
pub struct FileLock {
    lock_path: PathBuf,
    config: LockConfig,
    held: AtomicBool,
}

impl FileLock {
    /// Lock guarding `target`; nothing touches the filesystem until acquired
    pub fn new(target: impl AsRef<Path>) -> Self {
        Self::with_config(target, LockConfig::default())
    }

    pub fn with_config(target: impl AsRef<Path>, config: LockConfig) -> Self {
        Self {
            lock_path: lock_path_for(target.as_ref()),
            config,
            held: AtomicBool::new(false),
        }
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Whether this instance holds the lock
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }

    /// PID recorded by the current holder, if any
    pub fn owner_pid(&self) -> Option<u32> {
        fs::read_to_string(&self.lock_path)
            .ok()
            .and_then(|contents| contents.trim().parse().ok())
    }

    fn try_create(&self) -> LockResult<bool> {
        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.lock_path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        if let Err(e) = writeln!(file, "{}", std::process::id()) {
            // Do not leave an ownerless marker behind
            let _ = fs::remove_file(&self.lock_path);
            return Err(e.into());
        }

        self.held.store(true, Ordering::Release);
        debug!(path = %self.lock_path.display(), "File lock acquired");
        Ok(true)
    }

    async fn acquire_polling(&self, cancel: Option<&CancelToken>) -> LockResult<()> {
        loop {
            check_cancelled(cancel)?;
            if self.try_create()? {
                return Ok(());
            }
            trace!(path = %self.lock_path.display(), "File lock contended, polling");
            cancellable(tokio::time::sleep(self.config.poll_interval), cancel).await?;
        }
    }
}

impl Lockable for FileLock {
    fn acquire<'a>(&'a self, cancel: Option<&'a CancelToken>) -> BoxFuture<'a, LockResult<()>> {
        self.acquire_polling(cancel).boxed()
    }

    fn try_acquire(&self) -> LockResult<bool> {
        self.try_create()
    }

    fn release(&self) -> LockResult<()> {
        if !self.held.swap(false, Ordering::AcqRel) {
            return Err(LockError::NotAcquired);
        }

        match fs::remove_file(&self.lock_path) {
            Ok(()) => {
                debug!(path = %self.lock_path.display(), "File lock released");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %self.lock_path.display(), "Lock file vanished before release");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// True while any process holds the marker file
    fn is_locked(&self) -> bool {
        self.lock_path.exists()
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if *self.held.get_mut() {
            if let Err(e) = fs::remove_file(&self.lock_path) {
                warn!(
                    path = %self.lock_path.display(),
                    error = %e,
                    "Failed to remove lock file on drop"
                );
            }
        }
    }
}
