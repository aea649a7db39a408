//! Cross-thread redraw signaling.
//!
//! The redraw channel carries a payload-free "state changed, re-render"
//! wake-up from any producer thread to the single UI thread. It is not a
//! message queue: bursts of signals coalesce into one pending wake-up, and
//! the receiver always re-reads current store state instead of consuming
//! event data.
//!
//! # Example
//!
//! ```rust
//! use chatdesk_core::notify::redraw_channel;
//!
//! let (signal, mut receiver) = redraw_channel();
//!
//! // Network thread, after a store mutation:
//! signal.notify();
//!
//! // UI thread main loop:
//! // while receiver.wait() { /* re-read store, re-render */ }
//! ```

use tokio::sync::mpsc;

/// Producer half of the redraw channel. Cheap to clone; one per thread that
/// mutates the store.
#[derive(Clone)]
pub struct RedrawSignal {
    tx: mpsc::Sender<()>,
}

/// Consumer half of the redraw channel. Owned exclusively by the UI thread.
pub struct RedrawReceiver {
    rx: mpsc::Receiver<()>,
}

/// Create a connected signal/receiver pair.
///
/// The internal channel has capacity 1: a wake-up that arrives while one is
/// already pending is dropped, which is exactly the coalescing the UI wants.
pub fn redraw_channel() -> (RedrawSignal, RedrawReceiver) {
    let (tx, rx) = mpsc::channel(1);
    (RedrawSignal { tx }, RedrawReceiver { rx })
}

impl RedrawSignal {
    /// Request a re-render. Never blocks the caller.
    ///
    /// A full channel means a wake-up is already pending and this one is
    /// folded into it. A closed channel means the UI is gone (shutdown) and
    /// the signal is dropped.
    pub fn notify(&self) {
        let _ = self.tx.try_send(());
    }
}

impl RedrawReceiver {
    /// Block until a wake-up arrives.
    ///
    /// Returns false when every signal handle has been dropped, which is the
    /// UI loop's cue to exit. Must not be called from inside an async
    /// runtime; it is meant for a dedicated UI thread.
    pub fn wait(&mut self) -> bool {
        self.rx.blocking_recv().is_some()
    }

    /// Async variant of [`wait`](Self::wait), for event loops that are
    /// already running on a runtime.
    pub async fn recv(&mut self) -> bool {
        self.rx.recv().await.is_some()
    }

    /// Non-blocking poll, mainly useful in tests.
    pub fn try_recv(&mut self) -> bool {
        self.rx.try_recv().is_ok()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_coalesces_to_one_wakeup() {
        let (signal, mut receiver) = redraw_channel();

        for _ in 0..10 {
            signal.notify();
        }

        assert!(receiver.try_recv());
        // The other nine were folded into the first.
        assert!(!receiver.try_recv());
    }

    #[test]
    fn notify_after_drain_wakes_again() {
        let (signal, mut receiver) = redraw_channel();

        signal.notify();
        assert!(receiver.try_recv());

        signal.notify();
        assert!(receiver.try_recv());
    }

    #[test]
    fn cloned_signals_share_one_channel() {
        let (signal, mut receiver) = redraw_channel();
        let other = signal.clone();

        signal.notify();
        other.notify();

        assert!(receiver.try_recv());
        assert!(!receiver.try_recv());
    }

    #[test]
    fn wait_returns_false_when_all_signals_dropped() {
        let (signal, mut receiver) = redraw_channel();
        drop(signal);

        assert!(!receiver.wait());
    }

    #[test]
    fn wakes_a_blocked_ui_thread() {
        let (signal, mut receiver) = redraw_channel();

        let ui = std::thread::spawn(move || receiver.wait());

        signal.notify();
        assert!(ui.join().unwrap());
    }

    #[test]
    fn notify_without_receiver_does_not_panic() {
        let (signal, receiver) = redraw_channel();
        drop(receiver);

        signal.notify();
    }

    #[tokio::test]
    async fn async_recv_receives_wakeup() {
        let (signal, mut receiver) = redraw_channel();

        signal.notify();
        assert!(receiver.recv().await);
    }
}
