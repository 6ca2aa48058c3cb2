//! Seams between the popup controller and the host windowing system.

use std::sync::Arc;

use async_trait::async_trait;
use crx_common::{ContextId, Rect, Size, WindowError};
use tokio::sync::mpsc;

use super::types::PopupWindowSpec;

/// Lifecycle events a native popup window reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowEvent {
    /// The window became visible. Fired by `show()`, not by creation.
    Shown,
    /// The window lost focus.
    Blurred,
    /// The window is gone, whoever closed it.
    Closed,
    /// Hosted content asked for another top-level window.
    NewWindowRequested { url: String },
}

/// A native top-level window hosting popup content.
#[async_trait]
pub trait PopupWindow: Send + Sync {
    fn show(&self);

    /// Ask the window to close. It reports [`WindowEvent::Closed`] when done.
    fn close(&self);

    /// Tear the window down immediately.
    fn destroy(&self);

    fn is_destroyed(&self) -> bool;

    fn is_devtools_open(&self) -> bool;

    fn set_bounds(&self, bounds: Rect);

    fn set_bounds_animated(&self, bounds: Rect, animate: bool);

    fn set_size(&self, size: Size);

    /// Center on the current screen.
    fn center(&self);

    /// Evaluate `script` in the hosted document. `None` when the document
    /// is not ready or the result is not JSON.
    async fn execute_script(&self, script: &str) -> Option<serde_json::Value>;
}

/// Creates native popup windows. Events for the new window are pushed
/// into `events` until it closes.
pub trait WindowFactory: Send + Sync {
    fn create(
        &self,
        spec: PopupWindowSpec,
        events: mpsc::UnboundedSender<WindowEvent>,
    ) -> Result<Arc<dyn PopupWindow>, WindowError>;
}

/// Maps a tab or context to the on-screen bounds of the window showing it.
pub trait WindowLocator: Send + Sync {
    fn locate(&self, context: ContextId) -> Option<Rect>;
}

impl<F> WindowLocator for F
where
    F: Fn(ContextId) -> Option<Rect> + Send + Sync,
{
    fn locate(&self, context: ContextId) -> Option<Rect> {
        self(context)
    }
}
