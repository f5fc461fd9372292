// src/runtime/event_bus.rs

use super::system_events::SystemEvent;
use tokio::sync::broadcast::{self, Receiver, Sender};

// Slow observers past this many events start lagging.
const EVENT_BUS_CAPACITY: usize = 256;

/// Fan-out of lifecycle events to whoever is watching an executor.
///
/// Observation only: nothing in the executor waits on these events to make progress,
/// so a lagging or absent subscriber never changes behaviour.
#[derive(Debug, Clone)]
pub struct EventBus {
  sender: Sender<SystemEvent>,
}

impl EventBus {
  pub fn new() -> Self {
    let (sender, _) = broadcast::channel(EVENT_BUS_CAPACITY);
    Self { sender }
  }

  /// Sends `event` to current subscribers and returns how many received it.
  pub fn publish(&self, event: SystemEvent) -> usize {
    match self.sender.send(event) {
      Ok(receivers) => receivers,
      Err(broadcast::error::SendError(event)) => {
        tracing::trace!(event = ?event, "No event subscribers, event dropped");
        0
      }
    }
  }

  /// Subscribes to events published from now on.
  pub fn subscribe(&self) -> Receiver<SystemEvent> {
    self.sender.subscribe()
  }
}

impl Default for EventBus {
  fn default() -> Self {
    Self::new()
  }
}
