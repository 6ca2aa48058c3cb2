//! Named-channel message bus between isolated execution contexts.
//!
//! A context publishes a serialized payload on a channel name to every
//! listener a target context has registered for that name. Channels carry
//! only strings, never structured values, so anything sent can cross a
//! process boundary. Delivery on a single channel is FIFO; there is no
//! request/response correlation.

mod local;

pub use local::{LocalEndpoint, LocalTransport};

use crx_common::ContextId;
use tokio::sync::mpsc;

/// A message on the wire. Signals such as disconnect carry no body.
pub type Payload = Option<String>;

/// Receiving half of a channel subscription. Yields `None` once the
/// subscription has been released.
pub type Subscription = mpsc::UnboundedReceiver<Payload>;

/// One context's handle onto the shared bus.
pub trait Transport: Send + Sync {
    /// The context this handle sends from and subscribes in.
    fn context(&self) -> ContextId;

    /// Deliver `payload` to every listener `target` has registered on
    /// `channel`. Returns how many listeners were reached.
    fn send_to_all(&self, target: ContextId, channel: &str, payload: Payload) -> usize;

    /// Register a listener for `channel` in this context.
    fn subscribe(&self, channel: &str) -> Subscription;

    /// Drop every listener this context has on `channel`.
    fn unsubscribe_all(&self, channel: &str);
}
