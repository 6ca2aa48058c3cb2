//! Web-content capabilities for popup documents.
//!
//! Popup content comes from the extension, which is untrusted. Whatever
//! the extension asks for, the popup runs with the guest profile: no
//! host-process access, isolated and sandboxed.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Capabilities requested for a popup's web content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WebCapabilities {
    pub node_integration: bool,
    pub context_isolation: bool,
    pub sandbox: bool,
    pub web_security: bool,
    /// Whether content may open further windows.
    pub allow_popups: bool,
    pub devtools: bool,
    /// Script injected before the page loads.
    pub preload: Option<String>,
}

impl Default for WebCapabilities {
    fn default() -> Self {
        Self {
            node_integration: false,
            context_isolation: true,
            sandbox: true,
            web_security: true,
            allow_popups: false,
            devtools: cfg!(debug_assertions),
            preload: None,
        }
    }
}

/// Restricts a capability draft before it reaches a window.
pub trait CapabilitySanitizer: Send + Sync {
    fn sanitize(&self, capabilities: WebCapabilities) -> WebCapabilities;
}

/// The guest profile used for all extension content.
#[derive(Debug, Default, Clone, Copy)]
pub struct GuestCapabilitySanitizer;

impl CapabilitySanitizer for GuestCapabilitySanitizer {
    fn sanitize(&self, capabilities: WebCapabilities) -> WebCapabilities {
        if capabilities.node_integration || capabilities.preload.is_some() {
            debug!("stripping elevated capabilities from guest content");
        }
        WebCapabilities {
            node_integration: false,
            context_isolation: true,
            sandbox: true,
            web_security: true,
            allow_popups: false,
            devtools: capabilities.devtools,
            preload: None,
        }
    }
}
