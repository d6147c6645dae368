//! Timer-based event coalescing.
//!
//! A [`Debouncer`] holds at most one pending value and one deadline. Each
//! fed value overwrites the pending slot and resets the deadline; when the
//! deadline finally elapses, only the latest value is delivered. This is
//! strict last-write-wins: of a rapid burst, everything but the final event
//! is superseded while still waiting.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// A single-slot, resettable-deadline coalescer.
///
/// Delivery happens on a background task; the handle itself is cheap and
/// synchronous to feed from event callbacks.
#[derive(Debug)]
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn the coalescing task.
    ///
    /// `deliver` is invoked with the latest fed value once `window` has
    /// elapsed with no further events. A value still inside an open window
    /// is discarded when the `Debouncer` is dropped.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime, since the coalescing
    /// task has to live somewhere.
    pub fn new<F>(window: Duration, mut deliver: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();
        tokio::spawn(async move {
            loop {
                // Idle until a burst starts.
                let Some(first) = rx.recv().await else {
                    break;
                };
                let mut latest = first;
                let mut deadline = Instant::now() + window;
                loop {
                    tokio::select! {
                        received = rx.recv() => match received {
                            Some(next) => {
                                latest = next;
                                deadline = Instant::now() + window;
                            }
                            // Handle dropped mid-window: the pending value
                            // is superseded by nothing and never delivered.
                            None => return,
                        },
                        _ = tokio::time::sleep_until(deadline) => {
                            deliver(latest);
                            break;
                        }
                    }
                }
            }
        });
        Self { tx }
    }

    /// Feed an event into the window, superseding any pending value.
    pub fn feed(&self, value: T) {
        // The task only exits when this sender is dropped.
        let _ = self.tx.send(value);
    }
}
