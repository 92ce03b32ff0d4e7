/*!
 * UDP Bind Lock Tests
 */

use pretty_assertions::assert_eq;
use std::net::UdpSocket;
use waitkit::{CancelToken, LockConfig, LockError, Lockable, UdpBindLock};

fn free_port() -> u16 {
    UdpSocket::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[tokio::test]
async fn test_foreign_socket_blocks_lock() {
    let port = free_port();
    let foreign = UdpSocket::bind(("127.0.0.1", port)).unwrap();

    let lock = UdpBindLock::localhost(port);
    assert!(lock.is_locked());
    assert!(!lock.try_acquire().unwrap());

    drop(foreign);
    assert!(!lock.is_locked());
    assert!(lock.try_acquire().unwrap());
    lock.release().unwrap();
}

#[tokio::test]
async fn test_cancelled_while_contended() {
    let port = free_port();
    let holder = UdpBindLock::localhost(port);
    holder.try_acquire().unwrap();

    let waiter = UdpBindLock::with_config(holder.addr(), LockConfig::fast_poll());
    let token = CancelToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(25)).await;
        canceller.cancel();
    });

    assert_eq!(waiter.acquire(Some(&token)).await, Err(LockError::Cancelled));
    assert!(!waiter.is_held());
    holder.release().unwrap();
}
