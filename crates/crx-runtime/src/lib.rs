//! Chrome-extension compatibility runtime.
//!
//! Provides the two pieces of the extension shim that need real
//! coordination:
//! - [`port`]: long-lived `runtime.Port` connections multiplexed over a
//!   named-channel [`transport`], with the disconnect handshake and
//!   next-turn message delivery
//! - [`popup`]: transient extension popup windows anchored to an opener,
//!   with a polling auto-resize loop and platform-specific bounds
//!   application
//!
//! With the `native` feature, [`native`] backs popups with a wry webview
//! inside a winit window.

pub mod popup;
pub mod port;
pub mod transport;

#[cfg(feature = "native")]
pub mod native;

pub use popup::{
    PopupEnvironment, PopupEvent, PopupObserver, PopupOptions, PopupSettings, PopupState,
    PopupWindow, PopupWindowController, WindowEvent, WindowFactory, WindowLocator,
};
pub use port::{ChannelNames, ConnectedParty, MessageSender, Port, PortEvent, PortInit, PortObserver};
pub use transport::{LocalTransport, Transport};
