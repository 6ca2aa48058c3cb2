//! Popup window geometry and polling settings.

use serde::{Deserialize, Serialize};

/// Popup window behavior.
///
/// The popup is anchored to the right edge of its opener, `anchor_offset_y`
/// below the opener's top, and re-measured every `resize_interval_ms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupConfig {
    /// Auto-resize polling period in milliseconds (valid range: 50-10000).
    pub resize_interval_ms: u32,
    /// Vertical distance from the opener's top edge (valid range: 0-500).
    pub anchor_offset_y: f64,
    /// Size used before the first measurement (valid range: 1-4096).
    pub default_width: f64,
    pub default_height: f64,
    /// Background forced onto the popup document and window.
    pub background_color: String,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            resize_interval_ms: 500,
            anchor_offset_y: 40.0,
            default_width: 100.0,
            default_height: 100.0,
            background_color: "#FFFFFF".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popup_config_defaults() {
        let config = PopupConfig::default();
        assert_eq!(config.resize_interval_ms, 500);
        assert!((config.anchor_offset_y - 40.0).abs() < f64::EPSILON);
        assert!((config.default_width - 100.0).abs() < f64::EPSILON);
        assert!((config.default_height - 100.0).abs() < f64::EPSILON);
        assert_eq!(config.background_color, "#FFFFFF");
    }

    #[test]
    fn popup_config_partial_toml() {
        let config: PopupConfig = toml::from_str(
            r##"
resize_interval_ms = 250
background_color = "#fafafa"
"##,
        )
        .unwrap();
        assert_eq!(config.resize_interval_ms, 250);
        assert_eq!(config.background_color, "#fafafa");
        // Defaults preserved
        assert!((config.anchor_offset_y - 40.0).abs() < f64::EPSILON);
    }
}
