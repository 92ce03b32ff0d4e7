/*!
 * Mutex Tests
 * Mutual exclusion through both the guard and the `Lockable` API
 */

use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use waitkit::{LockError, Lockable, Mutex};

#[tokio::test]
async fn test_acquire_release_acquire() {
    let mutex = Mutex::new();
    mutex.acquire(None).await.unwrap();
    mutex.release().unwrap();
    mutex.acquire(None).await.unwrap();
    assert!(mutex.is_locked());
}

#[tokio::test]
async fn test_second_acquire_waits_for_release() {
    let mutex = Arc::new(Mutex::new());
    mutex.acquire(None).await.unwrap();

    let contender = mutex.clone();
    let handle = tokio::spawn(async move { contender.lock(None).await });

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!handle.is_finished());

    mutex.release().unwrap();
    let guard = tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert!(mutex.locked());
    drop(guard);
    assert!(!mutex.locked());
}

#[tokio::test]
async fn test_release_without_acquire() {
    let mutex = Mutex::new();
    assert_eq!(mutex.release(), Err(LockError::NotAcquired));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_exclusion_under_contention() {
    let mutex = Arc::new(Mutex::new());
    let inside = Arc::new(AtomicUsize::new(0));
    let max_inside = Arc::new(AtomicUsize::new(0));

    let mut tasks = Vec::new();
    for _ in 0..16 {
        let mutex = mutex.clone();
        let inside = inside.clone();
        let max_inside = max_inside.clone();
        tasks.push(tokio::spawn(async move {
            for _ in 0..10 {
                let guard = mutex.lock(None).await.unwrap();
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                max_inside.fetch_max(now, Ordering::SeqCst);
                tokio::task::yield_now().await;
                inside.fetch_sub(1, Ordering::SeqCst);
                drop(guard);
            }
        }));
    }

    for task in tasks {
        task.await.unwrap();
    }
    assert_eq!(max_inside.load(Ordering::SeqCst), 1);
    assert!(!mutex.locked());
}
