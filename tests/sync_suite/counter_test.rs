/*!
 * Counter Tests
 */

use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use waitkit::{CancelToken, Counter, Observable, SubscribeOptions, WaitError, Waitable};

#[tokio::test]
async fn test_wait_until_target() {
    let counter = Arc::new(Counter::new(0));
    let waiter = counter.clone();
    let handle = tokio::spawn(async move { waiter.wait(3, None).await });

    for _ in 0..3 {
        tokio::time::sleep(Duration::from_millis(5)).await;
        counter.increment();
    }

    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(counter.value(), 3);
}

#[tokio::test]
async fn test_wait_cancelled_tears_down_subscription() {
    let counter = Arc::new(Counter::new(0));
    let token = CancelToken::new();

    let waiter = counter.clone();
    let waiter_token = token.clone();
    let handle = tokio::spawn(async move { waiter.wait_for(10, Some(&waiter_token)).await });

    tokio::time::sleep(Duration::from_millis(20)).await;
    token.cancel();

    let result = tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result, Err(WaitError::Cancelled));
    assert_eq!(counter.subscribable().subscriber_count(), 0);
}

#[test]
fn test_updates_published() {
    let counter = Counter::new(5);
    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = seen.clone();
    counter
        .subscribe(
            Arc::new(move |v: &i64| sink.lock().push(*v)),
            SubscribeOptions::default(),
        )
        .unwrap();

    counter.add(10);
    counter.decrement();
    counter.set(-1);
    counter.reset();

    assert_eq!(*seen.lock(), vec![15, 14, -1, 5]);
}
