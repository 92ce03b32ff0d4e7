/*!
 * Deque Tests
 */

use pretty_assertions::assert_eq;
use std::sync::Arc;
use waitkit::{Deque, Observable, SubscribeOptions};

#[test]
fn test_both_ends_and_concat() {
    let deque = Deque::from_items([2, 3], Some(8)).unwrap();
    deque.unshift(1).unwrap();
    deque.push(4).unwrap();

    assert_eq!(deque.front(), Some(1));
    assert_eq!(deque.back(), Some(4));

    let view: Vec<i32> = deque.concat([5, 6]).collect();
    assert_eq!(view, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(deque.count(), 4);
}

#[test]
fn test_remove_and_replace_by_predicate() {
    let deque = Deque::from_items(1..=6, None).unwrap();

    assert_eq!(deque.remove(|v| v % 3 == 0), vec![3, 6]);
    assert_eq!(deque.remove_first(|v| *v > 1), Some(2));
    assert_eq!(deque.replace(|v| *v == 4, |v| v * 10), 1);
    assert_eq!(deque.to_vec(), vec![1, 40, 5]);
}

#[test]
fn test_count_changes_observable() {
    let deque = Deque::new();
    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = seen.clone();

    deque
        .subscribe(
            Arc::new(move |count: &usize| sink.lock().push(*count)),
            SubscribeOptions::default(),
        )
        .unwrap();

    deque.push_all(["a", "b"]).unwrap();
    deque.shift();
    deque.pop();
    deque.pop();

    assert_eq!(*seen.lock(), vec![2, 1, 0]);
}
