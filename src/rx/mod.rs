//! Reactive push-stream primitives.
//!
//! Two channel flavors and one timing primitive cover every coordination
//! pattern in the crate:
//!
//! - [`Publisher`]: a hot multicast stream. Emissions are shared live across
//!   subscribers; late subscribers see nothing from the past.
//! - [`StateCell`]: a replay-last cell for the few places that need
//!   behavior semantics (active filters, combined range channels): a
//!   [`StateWatch`] created from it yields the current value immediately.
//! - [`Debouncer`]: a timer-based coalescer; a single pending slot plus one
//!   resettable deadline, delivering only the latest value of a burst.
//!
//! All of it is message passing over `tokio::sync` channels; there are no
//! locks because there is no shared mutable state.

pub mod debounce;

pub use debounce::Debouncer;

use tokio::sync::{broadcast, watch};

/// Default buffer depth for hot streams.
///
/// Subscribers that fall further behind than this skip to the newest
/// emission (with a warning) rather than blocking the publisher.
const CHANNEL_DEPTH: usize = 32;

/// A hot multicast stream.
///
/// Publishing with no subscribers drops the value on the floor, exactly like
/// an event nobody listens to.
#[derive(Debug)]
pub struct Publisher<T> {
    tx: broadcast::Sender<T>,
}

impl<T> Clone for Publisher<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T: Clone> Publisher<T> {
    /// Create a stream with the default buffer depth.
    pub fn new() -> Self {
        Self {
            tx: broadcast::channel(CHANNEL_DEPTH).0,
        }
    }

    /// Emit a value to all current subscribers.
    pub fn publish(&self, value: T) {
        // No subscribers is not an error for an event stream.
        let _ = self.tx.send(value);
    }

    /// Subscribe to emissions from this point on. No history is replayed.
    pub fn subscribe(&self) -> Subscription<T> {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }
}

impl<T: Clone> Default for Publisher<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A subscription to a [`Publisher`].
#[derive(Debug)]
pub struct Subscription<T> {
    rx: broadcast::Receiver<T>,
}

impl<T: Clone> Subscription<T> {
    /// Wait for the next emission; `None` once every publisher handle is
    /// gone.
    ///
    /// A subscriber that lagged past the buffer depth skips to the newest
    /// emission rather than erroring.
    pub async fn next(&mut self) -> Option<T> {
        loop {
            match self.rx.recv().await {
                Ok(value) => return Some(value),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "stream subscriber lagged, skipping to newest");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking poll for an already-delivered emission.
    pub fn try_next(&mut self) -> Option<T> {
        loop {
            match self.rx.try_recv() {
                Ok(value) => return Some(value),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "stream subscriber lagged, skipping to newest");
                }
                Err(_) => return None,
            }
        }
    }
}

/// A replay-last state cell.
///
/// Unlike [`Publisher`], a watch created from the cell yields the current
/// value immediately; this is reserved for the components whose contract
/// requires replay.
#[derive(Debug)]
pub struct StateCell<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> StateCell<T> {
    /// Create a cell holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            tx: watch::channel(initial).0,
        }
    }

    /// Replace the value, waking all watchers.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Snapshot of the current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// A cheap handle for creating watches.
    pub fn handle(&self) -> StateHandle<T> {
        StateHandle {
            rx: self.tx.subscribe(),
        }
    }
}

/// A read handle on a [`StateCell`].
#[derive(Debug, Clone)]
pub struct StateHandle<T> {
    rx: watch::Receiver<T>,
}

impl<T: Clone> StateHandle<T> {
    /// Snapshot of the current value.
    pub fn current(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Watch with replay: the first [`StateWatch::next`] yields the current
    /// value immediately.
    pub fn watch(&self) -> StateWatch<T> {
        let mut rx = self.rx.clone();
        rx.mark_changed();
        StateWatch { rx }
    }

    /// Watch without replay: only values set after this call are yielded.
    pub fn changes(&self) -> StateWatch<T> {
        StateWatch {
            rx: self.rx.clone(),
        }
    }
}

/// An active watch on a [`StateCell`].
#[derive(Debug)]
pub struct StateWatch<T> {
    rx: watch::Receiver<T>,
}

impl<T: Clone> StateWatch<T> {
    /// Wait for the next value; `None` once the cell is gone.
    pub async fn next(&mut self) -> Option<T> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publisher_delivers_to_subscriber() {
        let stream: Publisher<u32> = Publisher::new();
        let mut sub = stream.subscribe();
        stream.publish(7);
        assert_eq!(sub.next().await, Some(7));
    }

    #[tokio::test]
    async fn publisher_does_not_replay_history() {
        let stream: Publisher<u32> = Publisher::new();
        stream.publish(1);
        let mut sub = stream.subscribe();
        assert_eq!(sub.try_next(), None);
        stream.publish(2);
        assert_eq!(sub.next().await, Some(2));
    }

    #[tokio::test]
    async fn publishing_without_subscribers_is_fine() {
        let stream: Publisher<u32> = Publisher::new();
        stream.publish(1);
    }

    #[tokio::test]
    async fn state_watch_replays_current_value() {
        let cell = StateCell::new("initial".to_string());
        let mut watch = cell.handle().watch();
        assert_eq!(watch.next().await.as_deref(), Some("initial"));

        cell.set("updated".to_string());
        assert_eq!(watch.next().await.as_deref(), Some("updated"));
    }

    #[tokio::test]
    async fn changes_watch_skips_current_value() {
        let cell = StateCell::new(1u32);
        let mut watch = cell.handle().changes();
        cell.set(2);
        assert_eq!(watch.next().await, Some(2));
    }

    #[tokio::test]
    async fn state_handle_snapshots_latest() {
        let cell = StateCell::new(1u32);
        let handle = cell.handle();
        cell.set(5);
        assert_eq!(handle.current(), 5);
    }
}
