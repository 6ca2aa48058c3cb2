use tokio::sync::mpsc;

/// Receives a popup's lifecycle notifications.
pub trait PopupObserver: Send + 'static {
    fn on_show(&mut self) {}

    fn on_closed(&mut self) {}
}

/// Popup notifications as values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupEvent {
    Shown,
    Closed,
}

impl PopupObserver for mpsc::UnboundedSender<PopupEvent> {
    fn on_show(&mut self) {
        let _ = self.send(PopupEvent::Shown);
    }

    fn on_closed(&mut self) {
        let _ = self.send(PopupEvent::Closed);
    }
}

/// Ignores every notification.
impl PopupObserver for () {}
