use serde_json::Value;
use tokio::sync::mpsc;

use super::sender::MessageSender;

/// Receives a port's notifications. Called from the port's delivery task,
/// never on the caller's turn.
pub trait PortObserver: Send + 'static {
    fn on_message(&mut self, message: Value, sender: &MessageSender);

    fn on_disconnect(&mut self) {}
}

/// Port notifications as values, for consumers that prefer a channel.
#[derive(Debug, Clone, PartialEq)]
pub enum PortEvent {
    Message { message: Value, sender: MessageSender },
    Disconnected,
}

impl PortObserver for mpsc::UnboundedSender<PortEvent> {
    fn on_message(&mut self, message: Value, sender: &MessageSender) {
        let _ = self.send(PortEvent::Message {
            message,
            sender: sender.clone(),
        });
    }

    fn on_disconnect(&mut self) {
        let _ = self.send(PortEvent::Disconnected);
    }
}
