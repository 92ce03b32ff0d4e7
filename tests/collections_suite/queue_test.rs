/*!
 * Queue Tests
 * FIFO ordering and waiting dequeue
 */

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use waitkit::{CancelToken, CollectionError, Queue};

#[test]
fn test_dequeue_first_of_initial_items() {
    let queue = Queue::from_items([1, 2, 3], None).unwrap();

    assert_eq!(queue.dequeue(), Some(1));
    assert_eq!(queue.count(), 2);
}

#[test]
fn test_dequeue_empty_returns_none() {
    let queue: Queue<String> = Queue::new();
    assert_eq!(queue.dequeue(), None);
    assert_eq!(queue.front(), None);
}

#[tokio::test]
async fn test_waiting_consumers_served_in_order() {
    let queue = Arc::new(Queue::new());
    let mut readers = Vec::new();

    for _ in 0..3 {
        let queue = queue.clone();
        readers.push(tokio::spawn(async move { queue.wait_dequeue(None).await }));
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    queue.enqueue_all(["a", "b", "c"]).unwrap();

    let mut received = Vec::new();
    for reader in readers {
        received.push(
            tokio::time::timeout(Duration::from_secs(1), reader)
                .await
                .unwrap()
                .unwrap()
                .unwrap(),
        );
    }
    received.sort();
    assert_eq!(received, vec!["a", "b", "c"]);
    assert!(queue.is_empty());
}

#[tokio::test]
async fn test_wait_dequeue_cancelled() {
    let queue: Queue<u8> = Queue::new();
    let token = CancelToken::new();
    token.cancel();

    assert_eq!(
        queue.wait_dequeue(Some(&token)).await,
        Err(CollectionError::Cancelled)
    );
}

proptest! {
    #[test]
    fn prop_fifo_order(items in proptest::collection::vec(any::<u32>(), 0..100)) {
        let queue = Queue::new();
        for item in &items {
            queue.enqueue(*item).unwrap();
        }

        let drained: Vec<u32> = std::iter::from_fn(|| queue.dequeue()).collect();
        prop_assert_eq!(drained, items);
    }
}
