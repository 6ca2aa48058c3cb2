//! Port channel naming.

use serde::{Deserialize, Serialize};

/// Prefixes of the two transport channels every port multiplexes over.
/// The port id is appended to each. Both ends of a connection must agree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PortConfig {
    pub disconnect_prefix: String,
    pub postmessage_prefix: String,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            disconnect_prefix: "CRX_PORT_DISCONNECT_".into(),
            postmessage_prefix: "CRX_PORT_POSTMESSAGE_".into(),
        }
    }
}
