//! Event fan-out for the user model.
//!
//! Subscribers listen for [`UserEvent`]s over a tokio broadcast channel.
//! Emission with no subscribers is not an error; events are notifications,
//! never load-bearing control flow.

use tokio::sync::broadcast;

use super::types::UserEvent;

/// Bounded fan-out capacity. A slow subscriber that falls further behind
/// than this loses oldest events (broadcast lag), not the model's result.
const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug)]
pub(crate) struct EventBus {
    sender: broadcast::Sender<UserEvent>,
}

impl EventBus {
    pub(crate) fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<UserEvent> {
        self.sender.subscribe()
    }

    pub(crate) fn emit(&self, event: UserEvent) {
        tracing::debug!(event = event.name(), "emitting model event");
        // A send error only means there are no subscribers right now.
        let _ = self.sender.send(event);
    }
}
