/*!
 * Signal
 *
 * Binary event with manual- or auto-reset behaviour.
 *
 * - Manual reset: `signal()` wakes every waiter and stays signaled, so later
 *   waits return immediately until `reset()`.
 * - Auto reset: `signal()` wakes exactly one waiter (oldest first) and the
 *   signal returns to unsignaled. With nobody waiting, the signal latches
 *   until the next waiter consumes it.
 *
 * A waiter that goes away before resolving (token fired or future dropped)
 * leaves the queue; an auto-reset wake already handed to it passes on.
 */

use super::cancel::{cancellable, CancelToken};
use super::subscribable::Subscribable;
use super::traits::{Observable, Waitable};
use crate::core::errors::{WaitError, WaitResult};
use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use tokio::sync::oneshot;
use tracing::trace;

struct SignalState {
    signaled: bool,
    waiters: VecDeque<(u64, oneshot::Sender<()>)>,
    next_id: u64,
}

/// Manual- or auto-reset event
pub struct Signal {
    auto_reset: bool,
    state: Mutex<SignalState>,
    events: Subscribable<bool>,
}

impl Signal {
    pub fn new(auto_reset: bool, initial: bool) -> Self {
        Self {
            auto_reset,
            state: Mutex::new(SignalState {
                signaled: initial,
                waiters: VecDeque::new(),
                next_id: 0,
            }),
            events: Subscribable::new(),
        }
    }

    /// Manual-reset signal, initially unsignaled
    pub fn manual() -> Self {
        Self::new(false, false)
    }

    /// Auto-reset signal, initially unsignaled
    pub fn auto() -> Self {
        Self::new(true, false)
    }

    #[inline]
    pub fn auto_reset(&self) -> bool {
        self.auto_reset
    }

    pub fn is_signaled(&self) -> bool {
        self.state.lock().signaled
    }

    /// Number of suspended waiters
    pub fn waiting(&self) -> usize {
        self.state.lock().waiters.len()
    }

    /// Raise the signal
    ///
    /// Returns the number of waiters woken.
    pub fn signal(&self) -> usize {
        let woken = {
            let mut state = self.state.lock();
            if self.auto_reset {
                let mut woken = 0;
                while let Some((_, tx)) = state.waiters.pop_front() {
                    if tx.send(()).is_ok() {
                        woken = 1;
                        break;
                    }
                }
                state.signaled = woken == 0;
                woken
            } else {
                state.signaled = true;
                state
                    .waiters
                    .drain(..)
                    .filter(|(_, tx)| !tx.is_closed())
                    .map(|(_, tx)| tx.send(()).is_ok())
                    .filter(|sent| *sent)
                    .count()
            }
        };

        trace!(woken, auto_reset = self.auto_reset, "Signal raised");
        self.events.publish(&true);
        woken
    }

    /// Force the unsignaled state
    pub fn reset(&self) {
        let was_signaled = std::mem::replace(&mut self.state.lock().signaled, false);
        if was_signaled {
            self.events.publish(&false);
        }
    }

    /// Suspend until signaled or `cancel` fires
    pub async fn wait_signaled(&self, cancel: Option<&CancelToken>) -> WaitResult<()> {
        if let Some(token) = cancel {
            token.check()?;
        }

        let (id, rx) = {
            let mut state = self.state.lock();
            if state.signaled {
                if self.auto_reset {
                    state.signaled = false;
                }
                return Ok(());
            }

            let (tx, rx) = oneshot::channel();
            let id = state.next_id;
            state.next_id += 1;
            state.waiters.push_back((id, tx));
            (id, rx)
        };

        let mut pending = PendingWait {
            signal: self,
            id,
            settled: false,
        };

        match cancellable(rx, cancel).await {
            Ok(_) => {
                pending.settled = true;
                Ok(())
            }
            Err(WaitError::Cancelled) => Err(WaitError::Cancelled),
        }
    }

    fn withdraw(&self, id: u64) {
        let consumed_wake = {
            let mut state = self.state.lock();
            match state.waiters.iter().position(|(waiter, _)| *waiter == id) {
                Some(pos) => {
                    state.waiters.remove(pos);
                    false
                }
                None => self.auto_reset,
            }
        };

        if consumed_wake {
            trace!(waiter = id, "Passing on an auto-reset wake from a departed waiter");
            self.signal();
        }
    }
}

/// Queued wait that has not resolved yet
struct PendingWait<'a> {
    signal: &'a Signal,
    id: u64,
    settled: bool,
}

impl Drop for PendingWait<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.signal.withdraw(self.id);
        }
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::manual()
    }
}

impl Observable for Signal {
    /// New signaled state after `signal()` / `reset()`
    type Event = bool;

    fn subscribable(&self) -> &Subscribable<bool> {
        &self.events
    }
}

impl Waitable for Signal {
    type Target = ();

    fn wait<'a>(&'a self, _target: (), cancel: Option<&'a CancelToken>) -> BoxFuture<'a, WaitResult<()>> {
        self.wait_signaled(cancel).boxed()
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Signal")
            .field("auto_reset", &self.auto_reset)
            .field("signaled", &state.signaled)
            .field("waiting", &state.waiters.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_manual_wakes_all_and_stays_signaled() {
        let signal = Arc::new(Signal::manual());

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let s = signal.clone();
                tokio::spawn(async move { s.wait_signaled(None).await })
            })
            .collect();

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(signal.waiting(), 3);
        assert_eq!(signal.signal(), 3);

        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }

        assert!(signal.is_signaled());
        assert!(signal.wait_signaled(None).await.is_ok());

        signal.reset();
        assert!(!signal.is_signaled());
    }

    #[tokio::test]
    async fn test_auto_reset_wakes_exactly_one() {
        let signal = Arc::new(Signal::auto());

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let s = signal.clone();
                tokio::spawn(async move { s.wait_signaled(None).await })
            })
            .collect();

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(signal.signal(), 1);
        assert!(!signal.is_signaled());

        tokio::time::sleep(Duration::from_millis(20)).await;
        let finished = handles.iter().filter(|h| h.is_finished()).count();
        assert_eq!(finished, 1);
        assert_eq!(signal.waiting(), 1);

        signal.signal();
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
    }

    #[tokio::test]
    async fn test_auto_reset_latches_without_waiters() {
        let signal = Signal::auto();
        assert_eq!(signal.signal(), 0);
        assert!(signal.is_signaled());

        signal.wait_signaled(None).await.unwrap();
        assert!(!signal.is_signaled());
    }

    #[tokio::test]
    async fn test_wait_cancelled() {
        let signal = Signal::manual();
        let token = CancelToken::new();
        token.cancel();

        assert_eq!(
            signal.wait_signaled(Some(&token)).await,
            Err(WaitError::Cancelled)
        );
        assert_eq!(signal.waiting(), 0);
    }

    #[test]
    fn test_dropped_waiter_passes_auto_reset_wake_on() {
        let signal = Signal::auto();

        let mut first = tokio_test::task::spawn(signal.wait_signaled(None));
        let mut second = tokio_test::task::spawn(signal.wait_signaled(None));
        tokio_test::assert_pending!(first.poll());
        tokio_test::assert_pending!(second.poll());
        assert_eq!(signal.waiting(), 2);

        // The wake goes to `first`, which is dropped before it runs
        assert_eq!(signal.signal(), 1);
        drop(first);

        assert!(second.is_woken());
        assert_eq!(tokio_test::assert_ready!(second.poll()), Ok(()));
        assert!(!signal.is_signaled());
        assert_eq!(signal.waiting(), 0);
    }

    #[test]
    fn test_dropped_sole_waiter_leaves_signal_latched() {
        let signal = Signal::auto();

        let mut waiter = tokio_test::task::spawn(signal.wait_signaled(None));
        tokio_test::assert_pending!(waiter.poll());
        assert_eq!(signal.signal(), 1);
        drop(waiter);

        assert!(signal.is_signaled());
        assert_eq!(signal.waiting(), 0);

        let mut next = tokio_test::task::spawn(signal.wait_signaled(None));
        assert_eq!(tokio_test::assert_ready!(next.poll()), Ok(()));
        assert!(!signal.is_signaled());
    }

    #[test]
    fn test_dropped_queued_waiter_is_withdrawn() {
        let signal = Signal::manual();

        let mut waiter = tokio_test::task::spawn(signal.wait_signaled(None));
        tokio_test::assert_pending!(waiter.poll());
        assert_eq!(signal.waiting(), 1);
        drop(waiter);

        assert_eq!(signal.waiting(), 0);
        assert!(!signal.is_signaled());
    }

    #[test]
    fn test_initial_state() {
        let signal = Signal::new(false, true);
        assert!(signal.is_signaled());
        signal.reset();
        assert!(!signal.is_signaled());
    }
}
