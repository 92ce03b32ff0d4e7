/*!
 * Signal Tests
 */

use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use waitkit::{CancelToken, Signal, WaitError, Waitable};

async fn spawn_waiters(signal: &Arc<Signal>, n: usize) -> Vec<tokio::task::JoinHandle<()>> {
    let mut handles = Vec::new();
    for _ in 0..n {
        let signal = signal.clone();
        handles.push(tokio::spawn(async move {
            signal.wait_signaled(None).await.unwrap();
        }));
    }
    while signal.waiting() < n {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    handles
}

#[tokio::test]
async fn test_manual_reset_wakes_all() {
    let signal = Arc::new(Signal::manual());
    let handles = spawn_waiters(&signal, 3).await;

    assert_eq!(signal.signal(), 3);
    for handle in handles {
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
    assert!(signal.is_signaled());

    // Stays signaled until reset
    signal.wait_signaled(None).await.unwrap();
    signal.reset();
    assert!(!signal.is_signaled());
}

#[tokio::test]
async fn test_auto_reset_wakes_exactly_one() {
    let signal = Arc::new(Signal::auto());
    let handles = spawn_waiters(&signal, 2).await;

    assert_eq!(signal.signal(), 1);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!signal.is_signaled());

    let finished = handles.iter().filter(|h| h.is_finished()).count();
    assert_eq!(finished, 1);

    assert_eq!(signal.signal(), 1);
    for handle in handles {
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
}

#[tokio::test]
async fn test_auto_reset_latches_without_waiters() {
    let signal = Signal::auto();
    assert_eq!(signal.signal(), 0);
    assert!(signal.is_signaled());

    signal.wait((), None).await.unwrap();
    assert!(!signal.is_signaled());
}

#[tokio::test]
async fn test_cancelled_wait() {
    let signal = Signal::manual();
    let token = CancelToken::new();
    token.cancel();
    assert_eq!(signal.wait_signaled(Some(&token)).await, Err(WaitError::Cancelled));
    assert_eq!(signal.waiting(), 0);
}
