/*!
 * UDP Bind Lock
 *
 * Cross-process exclusive lock that uses a UDP port as the token: whoever
 * has the port bound holds the lock. The socket stays open while held, so
 * the operating system releases the lock if the holder dies.
 *
 * The address must name a fixed port; binding port 0 always succeeds and
 * therefore excludes nobody.
 */

use super::config::LockConfig;
use crate::core::errors::{LockError, LockResult};
use crate::core::sync::{cancellable, check_cancelled, CancelToken, Lockable};
use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use tracing::{debug, trace};

/// Exclusive lock on a UDP socket address
#[derive(Debug)]
pub struct UdpBindLock {
    addr: SocketAddr,
    config: LockConfig,
    socket: Mutex<Option<UdpSocket>>,
}

impl UdpBindLock {
    pub fn new(addr: SocketAddr) -> Self {
        Self::with_config(addr, LockConfig::default())
    }

    pub fn with_config(addr: SocketAddr, config: LockConfig) -> Self {
        Self {
            addr,
            config,
            socket: Mutex::new(None),
        }
    }

    /// Lock on `port` of the IPv4 loopback interface
    pub fn localhost(port: u16) -> Self {
        Self::new(SocketAddr::from(([127, 0, 0, 1], port)))
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Whether this instance holds the lock
    pub fn is_held(&self) -> bool {
        self.socket.lock().is_some()
    }

    fn try_bind(&self) -> LockResult<bool> {
        let mut slot = self.socket.lock();
        if slot.is_some() {
            return Ok(false);
        }

        match UdpSocket::bind(self.addr) {
            Ok(socket) => {
                *slot = Some(socket);
                debug!(addr = %self.addr, "UDP bind lock acquired");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::AddrInUse => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn acquire_polling(&self, cancel: Option<&CancelToken>) -> LockResult<()> {
        loop {
            check_cancelled(cancel)?;
            if self.try_bind()? {
                return Ok(());
            }
            trace!(addr = %self.addr, "UDP bind lock contended, polling");
            cancellable(tokio::time::sleep(self.config.poll_interval), cancel).await?;
        }
    }
}

impl Lockable for UdpBindLock {
    fn acquire<'a>(&'a self, cancel: Option<&'a CancelToken>) -> BoxFuture<'a, LockResult<()>> {
        self.acquire_polling(cancel).boxed()
    }

    fn try_acquire(&self) -> LockResult<bool> {
        self.try_bind()
    }

    fn release(&self) -> LockResult<()> {
        let socket = self.socket.lock().take().ok_or(LockError::NotAcquired)?;
        drop(socket);
        debug!(addr = %self.addr, "UDP bind lock released");
        Ok(())
    }

    /// True while any process has the address bound
    fn is_locked(&self) -> bool {
        if self.is_held() {
            return true;
        }
        match UdpSocket::bind(self.addr) {
            Ok(_probe) => false,
            Err(e) => e.kind() == ErrorKind::AddrInUse,
        }
    }
}
