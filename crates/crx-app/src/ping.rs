//! In-process port round trip: a background context and a content context
//! connected over [`LocalTransport`], trading pings for pongs until the
//! background side disconnects.

use std::time::Duration;

use crx_common::{ContextId, CrxError, PortId};
use crx_config::CrxConfig;
use crx_runtime::{ChannelNames, ConnectedParty, LocalTransport, Port, PortEvent, PortInit};
use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, info};

const BACKGROUND: ContextId = ContextId(1);
const CONTENT: ContextId = ContextId(2);
const EXTENSION_ID: &str = "crx-host";
const STEP_TIMEOUT: Duration = Duration::from_secs(5);

/// What one round trip run observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingReport {
    pub pongs: u32,
    pub peer_saw_disconnect: bool,
}

fn init(port_id: &PortId, peer: ContextId) -> PortInit {
    PortInit {
        extension_id: EXTENSION_ID.into(),
        port_id: port_id.clone(),
        party: ConnectedParty::new(peer),
        name: Some("ping".into()),
    }
}

pub async fn run(config: &CrxConfig, count: u32) -> Result<PingReport, CrxError> {
    let bus = LocalTransport::new();
    let names = ChannelNames::from(&config.port);
    let port_id = PortId::new();

    let (bg_tx, mut bg_events) = mpsc::unbounded_channel();
    let (content_tx, mut content_events) = mpsc::unbounded_channel();
    let background = Port::connect(bus.endpoint(BACKGROUND), &names, init(&port_id, CONTENT), bg_tx);
    let content = Port::connect(bus.endpoint(CONTENT), &names, init(&port_id, BACKGROUND), content_tx);

    let mut pongs = 0;
    for seq in 0..count {
        background.try_post_message(&json!({ "ping": seq }))?;

        match next(&mut content_events).await? {
            PortEvent::Message { message, sender } => {
                debug!(from = %sender.tab_id, %message, "content received");
                content.try_post_message(&json!({ "pong": message["ping"] }))?;
            }
            PortEvent::Disconnected => return Err(CrxError::Other("content port closed early".into())),
        }

        if let PortEvent::Message { message, .. } = next(&mut bg_events).await? {
            if message["pong"] == json!(seq) {
                pongs += 1;
            }
        }
    }

    background.disconnect();
    let peer_saw_disconnect = loop {
        match next(&mut content_events).await {
            Ok(PortEvent::Disconnected) => break true,
            Ok(PortEvent::Message { .. }) => continue,
            Err(_) => break false,
        }
    };

    info!(pongs, peer_saw_disconnect, port_id = %port_id, "ping finished");
    Ok(PingReport {
        pongs,
        peer_saw_disconnect,
    })
}

async fn next(events: &mut mpsc::UnboundedReceiver<PortEvent>) -> Result<PortEvent, CrxError> {
    match timeout(STEP_TIMEOUT, events.recv()).await {
        Ok(Some(event)) => Ok(event),
        Ok(None) => Err(CrxError::Other("port observer dropped".into())),
        Err(_) => Err(CrxError::Other("timed out waiting for port event".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_then_disconnects() {
        let report = run(&CrxConfig::default(), 4).await.unwrap();
        assert_eq!(report.pongs, 4);
        assert!(report.peer_saw_disconnect);
    }

    #[tokio::test]
    async fn zero_count_still_disconnects() {
        let report = run(&CrxConfig::default(), 0).await.unwrap();
        assert_eq!(report.pongs, 0);
        assert!(report.peer_saw_disconnect);
    }

    #[tokio::test]
    async fn custom_channel_prefixes() {
        let mut config = CrxConfig::default();
        config.port.disconnect_prefix = "X_DISCONNECT_".into();
        config.port.postmessage_prefix = "X_MESSAGE_".into();
        let report = run(&config, 2).await.unwrap();
        assert_eq!(report.pongs, 2);
    }
}
