// SPDX-License-Identifier: MIT

//! Event Bus (C7): an in-process broadcast hub fanning out [`Event`]s to UI
//! subscribers. Built on `tokio::sync::broadcast` so FIFO-per-entity ordering
//! is a structural consequence of the channel's single in-order queue rather
//! than bookkeeping this crate has to get right by hand.
//!
//! A slow subscriber never blocks the publisher: `broadcast`'s bounded
//! capacity already drops the oldest entries for a lagging receiver, and
//! [`EventStream::recv`] surfaces that as a single synthetic
//! [`Event::Dropped`] marker instead of propagating `RecvError::Lagged`.

use hf_core::Event;
use tokio::sync::broadcast;

/// Per-subscriber queue depth.
pub const SUBSCRIBER_CAPACITY: usize = 64;

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(SUBSCRIBER_CAPACITY);
        Self { sender }
    }

    /// Publish one event to every current subscriber. A publish with zero
    /// subscribers is not an error — the bus has no replay, so an event with
    /// no listener at the time is simply gone.
    pub fn publish(&self, event: Event) {
        let _ = self.sender.send(event);
    }

    pub fn publish_all(&self, events: impl IntoIterator<Item = Event>) {
        for event in events {
            self.publish(event);
        }
    }

    /// Subscribe starting now — no replay of events emitted before this call.
    pub fn subscribe(&self) -> EventStream {
        EventStream { receiver: self.sender.subscribe() }
    }
}

/// A subscriber's view of the bus. Wraps the raw `broadcast::Receiver` so
/// callers never see `RecvError::Lagged` directly.
pub struct EventStream {
    receiver: broadcast::Receiver<Event>,
}

impl EventStream {
    /// Next event, or a synthetic [`Event::Dropped`] if this subscriber fell
    /// behind and the bus overwrote unread entries. Returns `None` only when
    /// the bus itself has been dropped (all senders gone).
    pub async fn recv(&mut self) -> Option<Event> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    return Some(Event::Dropped { count });
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
