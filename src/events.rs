use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Domain events published after each successfully committed mutation.
///
/// Consumers (the presentation layer, an export job, a notifier) receive
/// these on the channel side of [`EventSender`]; the core never blocks an
/// operation on a consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    DeviceCreated {
        serial: String,
    },
    DeviceUpdated {
        serial: String,
        location_changed: bool,
    },
    ComponentCreated {
        serial: String,
    },
    ComponentUpdated {
        serial: String,
    },
    /// A component was moved because the device it is connected to moved.
    ComponentCascaded {
        serial: String,
        device_serial: String,
    },
    LocationCreated {
        name: String,
        is_storage: bool,
    },
    LocationUpdated {
        name: String,
    },
    DeviceTypeCreated {
        name: String,
    },
    ComponentTypeCreated {
        name: String,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender over an existing channel half.
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Convenience constructor for a bounded event channel.
pub fn channel(capacity: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(capacity);
    (EventSender::new(tx), rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_round_trip_through_the_channel() {
        let (sender, mut rx) = channel(4);
        sender
            .send(Event::DeviceCreated {
                serial: "SN-1".to_string(),
            })
            .await
            .expect("send");

        match rx.recv().await {
            Some(Event::DeviceCreated { serial }) => assert_eq!(serial, "SN-1"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_fails_once_the_receiver_is_dropped() {
        let (sender, rx) = channel(1);
        drop(rx);
        let result = sender
            .send(Event::LocationUpdated {
                name: "BAR".to_string(),
            })
            .await;
        assert!(result.is_err());
    }
}
