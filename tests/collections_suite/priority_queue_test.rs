/*!
 * Priority Queue Tests
 */

use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use waitkit::{CancelToken, CollectionError, PriorityQueue};

#[test]
fn test_default_comparator_lower_first() {
    let queue = PriorityQueue::from_entries([("a", 5), ("b", 1)], None).unwrap();
    assert_eq!(queue.extract(), Some("b"));
}

#[test]
fn test_set_priority_changes_extraction_order() {
    let queue = PriorityQueue::new();
    queue.insert(1, ["build"]).unwrap();
    queue.insert(2, ["test"]).unwrap();
    queue.insert(3, ["deploy"]).unwrap();

    assert!(queue.set_priority(&"deploy", 0));
    assert!(queue.set_priority(&"build", 9));

    let order: Vec<&str> = std::iter::from_fn(|| queue.extract()).collect();
    assert_eq!(order, vec!["deploy", "test", "build"]);
}

#[test]
fn test_extract_empty_is_none() {
    let queue: PriorityQueue<u8, u8> = PriorityQueue::new();
    assert_eq!(queue.extract(), None);
    assert_eq!(queue.peek(), None);
    assert_eq!(queue.peek_priority(), None);
}

#[tokio::test]
async fn test_wait_insert_resumes_after_extract() {
    let queue = Arc::new(PriorityQueue::with_capacity(1));
    queue.insert(1u8, ["held"]).unwrap();

    let writer = queue.clone();
    let handle = tokio::spawn(async move { writer.wait_insert(0, ["next"], None).await });
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!handle.is_finished());

    assert_eq!(queue.extract(), Some("held"));
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(queue.peek(), Some("next"));
}

#[tokio::test]
async fn test_wait_extract_cancelled() {
    let queue: Arc<PriorityQueue<u8, u8>> = Arc::new(PriorityQueue::new());
    let token = CancelToken::new();

    let reader = queue.clone();
    let reader_token = token.clone();
    let handle = tokio::spawn(async move { reader.wait_extract(Some(&reader_token)).await });

    tokio::time::sleep(Duration::from_millis(20)).await;
    token.cancel();

    let result = tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result, Err(CollectionError::Cancelled));
}
