//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod logging;
mod popup;
mod port;

pub use logging::*;
pub use popup::*;
pub use port::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CrxConfig {
    pub popup: PopupConfig,
    pub port: PortConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config: CrxConfig = toml::from_str("").unwrap();
        assert_eq!(config.popup.resize_interval_ms, 500);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn unknown_sections_are_ignored() {
        let config: CrxConfig = toml::from_str(
            r#"
[theme]
name = "dark"

[popup]
default_width = 320.0
"#,
        )
        .unwrap();
        assert!((config.popup.default_width - 320.0).abs() < f64::EPSILON);
        assert!((config.popup.default_height - 100.0).abs() < f64::EPSILON);
    }
}
