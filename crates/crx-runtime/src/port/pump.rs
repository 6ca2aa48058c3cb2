//! The two tasks behind every port.

use std::sync::Arc;

use crx_common::{ContextId, PortId};
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::transport::{Payload, Subscription, Transport};

use super::channels::PortChannels;
use super::observer::PortObserver;
use super::sender::MessageSender;
use super::PortShared;

pub(super) enum Outbound {
    Message(String),
    Disconnect,
}

/// Drain the outbound queue onto the transport, in order. The disconnect
/// signal is the last thing sent.
pub(super) async fn send_outbound(
    mut queue: mpsc::UnboundedReceiver<Outbound>,
    transport: Arc<dyn Transport>,
    peer: ContextId,
    channels: PortChannels,
) {
    while let Some(item) = queue.recv().await {
        match item {
            Outbound::Message(json) => {
                trace!(channel = %channels.message, body_len = json.len(), "port send");
                transport.send_to_all(peer, &channels.message, Some(json));
            }
            Outbound::Disconnect => {
                transport.send_to_all(peer, &channels.disconnect, None);
                break;
            }
        }
    }
}

pub(super) struct Inbound {
    pub(super) port_id: PortId,
    pub(super) channels: PortChannels,
    pub(super) transport: Arc<dyn Transport>,
    pub(super) shared: Arc<PortShared>,
    pub(super) sender: MessageSender,
    pub(super) disconnect_rx: Subscription,
    pub(super) message_rx: Subscription,
}

/// Deliver inbound messages until the port disconnects, then fire
/// `on_disconnect` once. Pending messages win over a remote disconnect so
/// the peer's queue drains before it closes.
pub(super) async fn deliver_inbound<O: PortObserver>(mut inbound: Inbound, mut observer: O) {
    loop {
        tokio::select! {
            biased;

            _ = inbound.shared.closed.notified() => break,

            received = inbound.message_rx.recv() => match received {
                Some(payload) => {
                    deliver(&inbound.shared, &inbound.port_id, &inbound.sender, payload, &mut observer)
                        .await
                }
                None => break,
            },

            signal = inbound.disconnect_rx.recv() => {
                if signal.is_some() && inbound.shared.mark_disconnected() {
                    inbound.transport.unsubscribe_all(&inbound.channels.disconnect);
                    inbound.transport.unsubscribe_all(&inbound.channels.message);
                    debug!(port_id = %inbound.port_id, "port disconnected by peer");
                }
                break;
            }
        }
    }

    if inbound.shared.is_connected() {
        debug!(port_id = %inbound.port_id, "port subscriptions released without disconnect");
        return;
    }
    observer.on_disconnect();
}

async fn deliver<O: PortObserver>(
    shared: &PortShared,
    port_id: &PortId,
    sender: &MessageSender,
    payload: Payload,
    observer: &mut O,
) {
    // Hand over on a later turn, like a zero-delay timer would.
    tokio::task::yield_now().await;

    if !shared.is_connected() {
        trace!(%port_id, "message for disconnected port dropped");
        return;
    }

    let Some(raw) = payload else {
        warn!(%port_id, "port message without body dropped");
        return;
    };

    match serde_json::from_str(&raw) {
        Ok(message) => observer.on_message(message, sender),
        Err(e) => warn!(
            %port_id,
            body_len = raw.len(),
            error = %e,
            "port message rejected: invalid JSON"
        ),
    }
}
