use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crx_common::ContextId;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use super::{Payload, Subscription, Transport};

type Routes = Arc<Mutex<HashMap<(ContextId, String), Vec<mpsc::UnboundedSender<Payload>>>>>;

/// In-process bus shared by every context of one host. Each context talks
/// to it through its own [`LocalEndpoint`].
#[derive(Clone, Default)]
pub struct LocalTransport {
    routes: Routes,
}

impl LocalTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle for `context` onto this bus.
    pub fn endpoint(&self, context: ContextId) -> Arc<LocalEndpoint> {
        Arc::new(LocalEndpoint {
            context,
            routes: Arc::clone(&self.routes),
        })
    }

    /// Number of live listeners `context` has on `channel`.
    pub fn listener_count(&self, context: ContextId, channel: &str) -> usize {
        match self.routes.lock() {
            Ok(routes) => routes
                .get(&(context, channel.to_string()))
                .map(|senders| senders.iter().filter(|tx| !tx.is_closed()).count())
                .unwrap_or(0),
            Err(_) => 0,
        }
    }
}

pub struct LocalEndpoint {
    context: ContextId,
    routes: Routes,
}

impl Transport for LocalEndpoint {
    fn context(&self) -> ContextId {
        self.context
    }

    fn send_to_all(&self, target: ContextId, channel: &str, payload: Payload) -> usize {
        let Ok(mut routes) = self.routes.lock() else {
            return 0;
        };
        let Some(senders) = routes.get_mut(&(target, channel.to_string())) else {
            trace!(from = %self.context, to = %target, channel, "no listeners");
            return 0;
        };

        senders.retain(|tx| tx.send(payload.clone()).is_ok());
        let reached = senders.len();
        debug!(from = %self.context, to = %target, channel, reached, "transport send");
        reached
    }

    fn subscribe(&self, channel: &str) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut routes) = self.routes.lock() {
            routes
                .entry((self.context, channel.to_string()))
                .or_default()
                .push(tx);
        }
        rx
    }

    fn unsubscribe_all(&self, channel: &str) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.remove(&(self.context, channel.to_string()));
        }
    }
}
