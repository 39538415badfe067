//! Event types and the shared event bus
//!
//! Components never share mutable notification state. Anything that needs
//! to react to a change (the navbar unread badge, for example) subscribes to
//! the [`EventBus`] and re-derives its own view.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Propdesk event types
///
/// Events are broadcast via [`EventBus`]. They carry no notification data;
/// subscribers re-fetch whatever they display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PropdeskEvent {
    /// Notification read state or membership changed
    ///
    /// Triggers:
    /// - Navbar badge: refresh unread count
    /// - Any open notification list: re-render
    NotificationsChanged,
}

impl PropdeskEvent {
    /// Event name, used for logging
    pub fn event_type(&self) -> &str {
        match self {
            PropdeskEvent::NotificationsChanged => "NotificationsChanged",
        }
    }
}

/// Central event distribution bus for application-wide events
///
/// Backed by `tokio::sync::broadcast`:
/// - publishing never blocks on slow subscribers
/// - any number of subscribers
/// - subscribers are cleaned up when dropped
///
/// # Examples
///
/// ```
/// use propdesk_common::events::{EventBus, PropdeskEvent};
///
/// let bus = EventBus::new(64);
/// let mut rx = bus.subscribe();
///
/// bus.emit_lossy(PropdeskEvent::NotificationsChanged);
/// assert_eq!(rx.try_recv().unwrap(), PropdeskEvent::NotificationsChanged);
/// ```
#[derive(Debug)]
pub struct EventBus {
    tx: broadcast::Sender<PropdeskEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// `capacity` is the number of events buffered per subscriber before
    /// the oldest are dropped (the subscriber then sees `Lagged`).
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<PropdeskEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists,
    /// `Err` if nobody is listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: PropdeskEvent,
    ) -> Result<usize, broadcast::error::SendError<PropdeskEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: PropdeskEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("No subscribers for event");
        }
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
