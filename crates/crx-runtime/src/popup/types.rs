use std::time::Duration;

use crx_common::{Color, Rect, Size};
use crx_config::PopupConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::sanitize::WebCapabilities;

/// What the extension's background page asks for when opening a popup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PopupOptions {
    pub url: Option<String>,
    pub title: Option<String>,
    pub capabilities: Option<WebCapabilities>,
}

impl PopupOptions {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }
}

/// Where a new popup goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Explicit bounds next to the opener.
    Anchored(Rect),
    /// Only a size; the windowing system picks the position.
    Unpositioned(Size),
}

impl Placement {
    pub fn size(&self) -> Size {
        match self {
            Placement::Anchored(bounds) => bounds.size(),
            Placement::Unpositioned(size) => *size,
        }
    }
}

/// Everything a [`WindowFactory`](super::WindowFactory) needs to build
/// the native window: the caller's options with the fixed popup
/// presentation applied on top.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupWindowSpec {
    pub url: Option<String>,
    pub title: Option<String>,
    pub capabilities: WebCapabilities,
    pub placement: Placement,
    pub background_color: Color,
    pub frame: bool,
    pub resizable: bool,
    pub focusable: bool,
    pub skip_taskbar: bool,
    pub movable: bool,
    pub minimizable: bool,
    pub maximizable: bool,
    pub fullscreenable: bool,
    pub always_on_top: bool,
    pub use_content_size: bool,
    pub center: bool,
    /// Popups are created hidden and shown afterwards.
    pub show: bool,
    /// Content may never open another top-level window.
    pub block_new_windows: bool,
}

impl PopupWindowSpec {
    pub fn new(
        options: PopupOptions,
        capabilities: WebCapabilities,
        placement: Placement,
        background_color: Color,
    ) -> Self {
        Self {
            url: options.url,
            title: options.title,
            capabilities,
            placement,
            background_color,
            frame: false,
            resizable: false,
            focusable: true,
            skip_taskbar: true,
            movable: false,
            minimizable: false,
            maximizable: false,
            fullscreenable: false,
            always_on_top: true,
            use_content_size: true,
            center: true,
            show: false,
            block_new_windows: true,
        }
    }
}

/// Runtime popup settings, usually built from [`PopupConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct PopupSettings {
    pub resize_interval: Duration,
    pub anchor_offset_y: f64,
    pub default_size: Size,
    pub background_color: Color,
}

impl Default for PopupSettings {
    fn default() -> Self {
        Self::from(&PopupConfig::default())
    }
}

impl From<&PopupConfig> for PopupSettings {
    fn from(config: &PopupConfig) -> Self {
        let background_color = Color::from_hex(&config.background_color).unwrap_or_else(|| {
            warn!(
                color = %config.background_color,
                "invalid popup background color, using white"
            );
            Color::WHITE
        });
        Self {
            resize_interval: Duration::from_millis(u64::from(config.resize_interval_ms.max(1))),
            anchor_offset_y: config.anchor_offset_y,
            default_size: Size::new(config.default_width, config.default_height),
            background_color,
        }
    }
}

/// Lifecycle of one popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupState {
    /// Created, not yet shown.
    Constructed,
    /// Visible, resize loop running.
    Shown,
    /// The window reported it closed.
    Closed,
    /// Torn down by the owner before the window reported closing.
    Destroyed,
}

impl PopupState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PopupState::Closed | PopupState::Destroyed)
    }
}
