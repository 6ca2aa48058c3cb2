//! Popup placement and the per-platform bounds call.

use std::sync::Arc;

use crx_common::{Rect, Size};

use super::window::PopupWindow;

/// Bounds for a popup of `size` hanging off the right edge of `opener`,
/// `offset_y` below its top.
pub fn anchored_bounds(opener: Rect, size: Size, offset_y: f64) -> Rect {
    Rect::new(
        opener.x + opener.width - size.width,
        opener.y + offset_y,
        size.width,
        size.height,
    )
}

/// Applies position and size to a window in one call.
pub trait BoundsApplier: Send + Sync {
    fn apply(&self, window: &dyn PopupWindow, bounds: Rect);
}

/// macOS: bounds changes must be flagged as animated.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnimatedBounds;

impl BoundsApplier for AnimatedBounds {
    fn apply(&self, window: &dyn PopupWindow, bounds: Rect) {
        window.set_bounds_animated(bounds, true);
    }
}

/// Windows and Linux: the bounds call rejects any extra argument.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainBounds;

impl BoundsApplier for PlainBounds {
    fn apply(&self, window: &dyn PopupWindow, bounds: Rect) {
        window.set_bounds(bounds);
    }
}

/// The applier for the platform this binary was built for.
pub fn host_bounds_applier() -> Arc<dyn BoundsApplier> {
    if cfg!(target_os = "macos") {
        Arc::new(AnimatedBounds)
    } else {
        Arc::new(PlainBounds)
    }
}
