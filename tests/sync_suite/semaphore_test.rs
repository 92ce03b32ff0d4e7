/*!
 * Semaphore Tests
 * Permit accounting, FIFO grants and cancellation
 */

use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use waitkit::{CancelToken, LockError, Semaphore};

#[tokio::test]
async fn test_permits_never_exceed_capacity() {
    let semaphore = Semaphore::new(3);
    let a = semaphore.acquire(2, None).await.unwrap();
    let b = semaphore.try_acquire(1).unwrap().unwrap();
    assert_eq!(semaphore.available(), 0);
    assert!(semaphore.try_acquire(1).unwrap().is_none());

    a.release().unwrap();
    assert_eq!(a.release(), Err(LockError::AlreadyReleased));
    drop(b);
    assert_eq!(semaphore.available(), 3);
}

#[tokio::test]
async fn test_request_over_capacity_rejected() {
    let semaphore = Semaphore::new(2);
    assert_eq!(
        semaphore.acquire(3, None).await.unwrap_err(),
        LockError::ExceedsCapacity {
            requested: 3,
            capacity: 2
        }
    );
}

#[tokio::test]
async fn test_waiters_granted_in_arrival_order() {
    let semaphore = Semaphore::new(1);
    let held = semaphore.acquire(1, None).await.unwrap();
    let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

    let mut handles = Vec::new();
    for id in 0..4 {
        let semaphore = semaphore.clone();
        let order = order.clone();
        handles.push(tokio::spawn(async move {
            let permit = semaphore.acquire(1, None).await.unwrap();
            order.lock().push(id);
            drop(permit);
        }));
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    assert_eq!(semaphore.waiting(), 4);
    drop(held);
    for handle in handles {
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
    assert_eq!(*order.lock(), vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn test_cancelled_acquire_leaves_permits_untouched() {
    let semaphore = Semaphore::new(2);
    let held = semaphore.acquire(2, None).await.unwrap();
    let token = CancelToken::new();

    let waiter = semaphore.clone();
    let waiter_token = token.clone();
    let handle = tokio::spawn(async move { waiter.acquire(1, Some(&waiter_token)).await });

    tokio::time::sleep(Duration::from_millis(20)).await;
    token.cancel();

    let result = tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(result, Err(LockError::Cancelled)));
    assert_eq!(semaphore.waiting(), 0);

    drop(held);
    assert_eq!(semaphore.available(), 2);
}
