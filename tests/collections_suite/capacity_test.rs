/*!
 * Capacity Tests
 *
 * Bounded inserts across every adapter, and cancellation atomicity of the
 * waiting variants.
 */

use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use waitkit::{CancelToken, CollectionError, Deque, PriorityQueue, Queue, Stack};

const CAPACITY: usize = 4;

fn is_capacity_exceeded<T>(result: Result<T, CollectionError>) -> bool {
    matches!(result, Err(CollectionError::CapacityExceeded { .. }))
}

#[test]
fn test_n_inserts_succeed_and_next_fails() {
    let queue = Queue::with_capacity(CAPACITY);
    let stack = Stack::with_capacity(CAPACITY);
    let deque = Deque::with_capacity(CAPACITY);
    let heap = PriorityQueue::with_capacity(CAPACITY);

    for i in 0..CAPACITY {
        queue.enqueue(i).unwrap();
        stack.push(i).unwrap();
        deque.unshift(i).unwrap();
        heap.push(i, i).unwrap();
    }

    assert!(is_capacity_exceeded(queue.enqueue(99)));
    assert!(is_capacity_exceeded(stack.push(99)));
    assert!(is_capacity_exceeded(deque.push(99)));
    assert!(is_capacity_exceeded(heap.push(99, 0)));

    assert_eq!(queue.count(), CAPACITY);
    assert_eq!(stack.count(), CAPACITY);
    assert_eq!(deque.count(), CAPACITY);
    assert_eq!(heap.count(), CAPACITY);
}

#[test]
fn test_initial_items_over_capacity_rejected() {
    assert!(is_capacity_exceeded(Queue::from_items(0..5, Some(4))));
    assert!(is_capacity_exceeded(PriorityQueue::from_entries(
        [(1, 1), (2, 2)],
        Some(1)
    )));
}

#[tokio::test]
async fn test_wait_push_completes_after_removal() {
    let stack = Arc::new(Stack::from_items(0..CAPACITY, Some(CAPACITY)).unwrap());

    let writer = stack.clone();
    let handle = tokio::spawn(async move { writer.wait_push(100, None).await });
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!handle.is_finished());

    assert_eq!(stack.pop(), Some(CAPACITY - 1));
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(stack.top(), Some(100));
    assert_eq!(stack.count(), CAPACITY);
}

#[tokio::test]
async fn test_cancelled_wait_push_leaves_no_trace() {
    let deque = Arc::new(Deque::from_items([1, 2], Some(2)).unwrap());
    let token = CancelToken::new();

    let writer = deque.clone();
    let writer_token = token.clone();
    let handle = tokio::spawn(async move {
        writer
            .wait_push_all([10, 11], Some(&writer_token))
            .await
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    token.cancel();

    let result = tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result, Err(CollectionError::Cancelled));
    assert_eq!(deque.to_vec(), vec![1, 2]);

    // Capacity freed after cancellation must not resurrect the cancelled push
    deque.clear();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(deque.is_empty());
}

#[tokio::test]
async fn test_request_larger_than_capacity_fails_fast() {
    let queue: Queue<u8> = Queue::with_capacity(2);
    assert!(is_capacity_exceeded(
        queue.wait_enqueue_all([1, 2, 3], None).await
    ));
}
