use crx_common::PortId;
use crx_config::PortConfig;

/// Prefixes from which a port's two transport channels are derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelNames {
    disconnect_prefix: String,
    postmessage_prefix: String,
}

/// The concrete channel names of one port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PortChannels {
    pub(crate) disconnect: String,
    pub(crate) message: String,
}

impl ChannelNames {
    pub fn new(disconnect_prefix: impl Into<String>, postmessage_prefix: impl Into<String>) -> Self {
        Self {
            disconnect_prefix: disconnect_prefix.into(),
            postmessage_prefix: postmessage_prefix.into(),
        }
    }

    /// Channel signalling that either end has disconnected `port_id`.
    pub fn disconnect(&self, port_id: &PortId) -> String {
        format!("{}{}", self.disconnect_prefix, port_id)
    }

    /// Channel carrying serialized messages for `port_id`.
    pub fn post_message(&self, port_id: &PortId) -> String {
        format!("{}{}", self.postmessage_prefix, port_id)
    }

    pub(crate) fn for_port(&self, port_id: &PortId) -> PortChannels {
        PortChannels {
            disconnect: self.disconnect(port_id),
            message: self.post_message(port_id),
        }
    }
}

impl Default for ChannelNames {
    fn default() -> Self {
        Self::from(&PortConfig::default())
    }
}

impl From<&PortConfig> for ChannelNames {
    fn from(config: &PortConfig) -> Self {
        Self::new(&config.disconnect_prefix, &config.postmessage_prefix)
    }
}
