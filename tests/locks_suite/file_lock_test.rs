/*!
 * File Lock Tests
 */

use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use waitkit::{FileLock, LockConfig, LockError, Lockable};

#[tokio::test]
async fn test_contended_acquire_resumes_after_release() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("shared.db");

    let holder = Arc::new(FileLock::new(&target));
    holder.acquire(None).await.unwrap();
    assert!(holder.lock_path().exists());

    let waiter = Arc::new(FileLock::with_config(&target, LockConfig::fast_poll()));
    let contender = waiter.clone();
    let handle = tokio::spawn(async move { contender.acquire(None).await });

    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(!handle.is_finished());

    holder.release().unwrap();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert!(waiter.is_held());
    assert_eq!(waiter.owner_pid(), Some(std::process::id()));
}

#[tokio::test]
async fn test_release_twice_fails() {
    let dir = TempDir::new().unwrap();
    let lock = FileLock::new(dir.path().join("a"));

    assert_eq!(lock.release(), Err(LockError::NotAcquired));
    lock.acquire(None).await.unwrap();
    lock.release().unwrap();
    assert_eq!(lock.release(), Err(LockError::NotAcquired));
    assert!(!lock.is_locked());
}

#[tokio::test]
async fn test_usable_as_trait_object() {
    let dir = TempDir::new().unwrap();
    let locks: Vec<Box<dyn Lockable>> = vec![
        Box::new(FileLock::new(dir.path().join("one"))),
        Box::new(FileLock::new(dir.path().join("two"))),
    ];

    for lock in &locks {
        assert!(lock.try_acquire().unwrap());
    }
    assert!(locks.iter().all(|lock| lock.is_locked()));
    for lock in &locks {
        lock.release().unwrap();
    }
}
