use crx_common::ContextId;
use serde::{Deserialize, Serialize};

/// The other end of a connection, as described by the connection-setup
/// step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedParty {
    pub tab_id: ContextId,
    pub url: Option<String>,
    /// Tab metadata, passed through untouched.
    pub tab: Option<serde_json::Value>,
}

impl ConnectedParty {
    pub fn new(tab_id: ContextId) -> Self {
        Self {
            tab_id,
            url: None,
            tab: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_tab(mut self, tab: serde_json::Value) -> Self {
        self.tab = Some(tab);
        self
    }
}

/// `runtime.MessageSender`: who is on the other end of a port, captured
/// once at connection time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSender {
    /// The extension id.
    pub id: String,
    pub tab_id: ContextId,
    pub url: Option<String>,
    pub tab: Option<serde_json::Value>,
}

impl MessageSender {
    pub fn new(extension_id: impl Into<String>, party: &ConnectedParty) -> Self {
        Self {
            id: extension_id.into(),
            tab_id: party.tab_id,
            url: party.url.clone(),
            tab: party.tab.clone(),
        }
    }
}
