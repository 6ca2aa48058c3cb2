//! `runtime.Port`: a long-lived, bidirectional connection to one other
//! context.
//!
//! A port multiplexes over two transport channels derived from its id,
//! one for messages and one for the disconnect signal. Outbound messages
//! go through a queue drained by a separate task, and inbound messages are
//! handed to the observer one turn after they arrive, so a handler that
//! posts from inside `on_message` can never re-enter itself.
//!
//! Disconnect is one-shot. After it, nothing is sent or delivered and
//! `on_disconnect` has fired exactly once.

mod channels;
mod observer;
mod pump;
mod sender;


use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crx_common::{ContextId, PortError, PortId};
use serde::Serialize;
use tokio::sync::{mpsc, Notify};
use tracing::{debug, warn};

use crate::transport::Transport;

pub use channels::ChannelNames;
pub use observer::{PortEvent, PortObserver};
pub use sender::{ConnectedParty, MessageSender};

use channels::PortChannels;
use pump::Outbound;

/// Identity of a new connection, supplied by the connection-setup step.
#[derive(Debug, Clone)]
pub struct PortInit {
    pub extension_id: String,
    pub port_id: PortId,
    pub party: ConnectedParty,
    pub name: Option<String>,
}

/// State shared between the handle and its delivery task.
pub(crate) struct PortShared {
    connected: AtomicBool,
    closed: Notify,
}

impl PortShared {
    fn new() -> Self {
        Self {
            connected: AtomicBool::new(true),
            closed: Notify::new(),
        }
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Flip to disconnected. Only the first caller gets `true`.
    pub(crate) fn mark_disconnected(&self) -> bool {
        self.connected.swap(false, Ordering::AcqRel)
    }
}

pub struct Port {
    extension_id: String,
    port_id: PortId,
    peer: ContextId,
    name: Option<String>,
    sender: MessageSender,
    channels: PortChannels,
    transport: Arc<dyn Transport>,
    shared: Arc<PortShared>,
    outbound: mpsc::UnboundedSender<Outbound>,
}

impl Port {
    /// Open the local end of a connection.
    ///
    /// Subscribes to the port's channels before returning, so nothing the
    /// peer sends afterwards is missed. Must be called inside a tokio
    /// runtime.
    pub fn connect(
        transport: Arc<dyn Transport>,
        names: &ChannelNames,
        init: PortInit,
        observer: impl PortObserver,
    ) -> Self {
        let channels = names.for_port(&init.port_id);
        let sender = MessageSender::new(init.extension_id.clone(), &init.party);
        let peer = init.party.tab_id;
        let shared = Arc::new(PortShared::new());

        let disconnect_rx = transport.subscribe(&channels.disconnect);
        let message_rx = transport.subscribe(&channels.message);

        tokio::spawn(pump::deliver_inbound(
            pump::Inbound {
                port_id: init.port_id.clone(),
                channels: channels.clone(),
                transport: Arc::clone(&transport),
                shared: Arc::clone(&shared),
                sender: sender.clone(),
                disconnect_rx,
                message_rx,
            },
            observer,
        ));

        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        tokio::spawn(pump::send_outbound(
            outbound_rx,
            Arc::clone(&transport),
            peer,
            channels.clone(),
        ));

        debug!(
            port_id = %init.port_id,
            extension_id = %init.extension_id,
            context = %transport.context(),
            peer = %peer,
            "port connected"
        );

        Self {
            extension_id: init.extension_id,
            port_id: init.port_id,
            peer,
            name: init.name,
            sender,
            channels,
            transport,
            shared,
            outbound,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn extension_id(&self) -> &str {
        &self.extension_id
    }

    pub fn port_id(&self) -> &PortId {
        &self.port_id
    }

    /// The context on the other end.
    pub fn peer(&self) -> ContextId {
        self.peer
    }

    pub fn sender(&self) -> &MessageSender {
        &self.sender
    }

    pub fn is_connected(&self) -> bool {
        self.shared.is_connected()
    }

    /// Send a message to the peer on a later turn.
    ///
    /// Posting on a disconnected port, or a message that does not
    /// serialize, is logged and dropped.
    pub fn post_message<T: Serialize + ?Sized>(&self, message: &T) {
        match self.try_post_message(message) {
            Ok(()) => {}
            Err(PortError::ChannelClosed(_)) => {
                debug!(port_id = %self.port_id, "post on disconnected port dropped");
            }
            Err(e) => {
                warn!(port_id = %self.port_id, error = %e, "port message dropped");
            }
        }
    }

    /// Like [`post_message`](Self::post_message), but reports why a message
    /// was not queued.
    pub fn try_post_message<T: Serialize + ?Sized>(&self, message: &T) -> Result<(), PortError> {
        if !self.is_connected() {
            return Err(PortError::ChannelClosed(self.port_id.to_string()));
        }
        let json = serde_json::to_string(message)?;
        self.outbound
            .send(Outbound::Message(json))
            .map_err(|_| PortError::ChannelClosed(self.port_id.to_string()))
    }

    /// Close the connection from this end. Later calls do nothing.
    ///
    /// Messages already queued are still sent to the peer, followed by the
    /// disconnect signal.
    pub fn disconnect(&self) {
        if !self.shared.mark_disconnected() {
            return;
        }

        let _ = self.outbound.send(Outbound::Disconnect);
        self.transport.unsubscribe_all(&self.channels.disconnect);
        self.transport.unsubscribe_all(&self.channels.message);
        self.shared.closed.notify_one();

        debug!(port_id = %self.port_id, "port disconnected locally");
    }
}

impl std::fmt::Debug for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Port")
            .field("extension_id", &self.extension_id)
            .field("port_id", &self.port_id)
            .field("peer", &self.peer)
            .field("name", &self.name)
            .field("connected", &self.is_connected())
            .finish()
    }
}
