//! Configuration for the extension compatibility runtime.
//!
//! TOML-based, with `serde(default)` on every section so partial files
//! work out of the box. Covers popup geometry and timing, port channel
//! naming, and logging.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use crx_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{CrxConfig, LoggingConfig, PopupConfig, PortConfig, CONFIG_SCHEMA_VERSION};
pub use toml_loader::{load_default, load_from_path};

use crx_common::ConfigError;

/// Load config from the platform default path and validate it.
pub fn load_config() -> Result<CrxConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &CrxConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let config = CrxConfig::default();
        let json = config_to_json(&config);
        assert!(json.contains("\"popup\""));
        assert!(json.contains("\"port\""));
        assert!(json.contains("\"logging\""));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn default_config_survives_json() {
        let config = CrxConfig::default();
        let json = config_to_json(&config);
        let parsed: CrxConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.popup.resize_interval_ms, 500);
        assert_eq!(parsed.port.disconnect_prefix, "CRX_PORT_DISCONNECT_");
        assert_eq!(parsed.logging.level, "info");
    }
}
