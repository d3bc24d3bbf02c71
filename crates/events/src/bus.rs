//! Event publishing/subscription abstraction (mechanics only).
//!
//! The order model publishes a notification every time the bill changes;
//! views subscribe and re-render from the carried snapshot. The bus makes
//! minimal assumptions:
//!
//! - **Transport-agnostic**: in-memory channels today, anything else later
//! - **No persistence**: a subscriber that was not registered misses the message
//! - **Snapshot payloads**: consumers only ever need the latest message

use std::sync::mpsc::{Receiver, TryRecvError};

/// A subscription to an event stream.
///
/// Each subscription gets a copy of every message published after it was
/// created (broadcast semantics). Subscriptions are meant to be drained on
/// the thread that owns the view.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Drain everything currently queued and return only the newest message.
    ///
    /// Returns `None` when nothing was published since the last drain.
    pub fn latest(&self) -> Option<M> {
        let mut last = None;
        while let Ok(message) = self.receiver.try_recv() {
            last = Some(message);
        }
        last
    }
}

/// Publish/subscribe interface.
pub trait EventBus<M> {
    type Error: core::fmt::Debug;

    /// Fan `message` out to every live subscription.
    fn publish(&self, message: M) -> Result<(), Self::Error>;

    /// Register a new subscription.
    fn subscribe(&self) -> Subscription<M>;
}
