/*!
 * Stack Tests
 */

use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use waitkit::{Stack, StackCollection};

#[test]
fn test_pop_reverses_push() {
    let stack = Stack::new();
    for i in 0..5 {
        stack.push(i).unwrap();
    }

    let popped: Vec<i32> = std::iter::from_fn(|| stack.pop()).collect();
    assert_eq!(popped, vec![4, 3, 2, 1, 0]);
    assert_eq!(stack.pop(), None);
}

#[tokio::test]
async fn test_wait_pop_through_trait_object() {
    let stack: Arc<dyn StackCollection<Item = &'static str>> = Arc::new(Stack::new());
    let reader = stack.clone();

    let handle = tokio::spawn(async move { reader.wait_pop(None).await });
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!handle.is_finished());

    stack.push("top").unwrap();
    let value = tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(value, "top");
}
