/*!
 * Subscribable Tests
 */

use pretty_assertions::assert_eq;
use std::sync::Arc;
use waitkit::{SubscribeOptions, Subscribable, Subscriber, Unsubscribe};

#[test]
fn test_panicking_subscriber_isolated() {
    let hub = Subscribable::<u8>::new();
    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));

    hub.subscribe(
        Arc::new(|_: &u8| panic!("subscriber failure")),
        SubscribeOptions::default(),
    )
    .unwrap();
    let sink = seen.clone();
    hub.subscribe(
        Arc::new(move |v: &u8| sink.lock().push(*v)),
        SubscribeOptions::default(),
    )
    .unwrap();

    assert_eq!(hub.publish(&7), 2);
    assert_eq!(hub.publish(&8), 2);
    assert_eq!(*seen.lock(), vec![7, 8]);
}

#[test]
fn test_unsubscribe_during_publish() {
    let hub = Arc::new(Subscribable::<u8>::new());
    let handle_slot: Arc<parking_lot::Mutex<Option<Unsubscribe>>> =
        Arc::new(parking_lot::Mutex::new(None));

    let slot = handle_slot.clone();
    let callback: Subscriber<u8> = Arc::new(move |_: &u8| {
        if let Some(handle) = slot.lock().take() {
            handle.unsubscribe();
        }
    });
    *handle_slot.lock() = hub.subscribe(callback, SubscribeOptions::default());

    assert_eq!(hub.publish(&1), 1);
    assert_eq!(hub.subscriber_count(), 0);
    assert_eq!(hub.publish(&2), 0);
}
