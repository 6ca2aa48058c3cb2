//! Configuration validation.
//!
//! Each section has its own check; this orchestrator calls them all and
//! collects errors into a single `ConfigError`.

mod helpers;


use crate::schema::CrxConfig;
use crx_common::{Color, ConfigError};

use helpers::{check_bounds, check_not_empty};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &CrxConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_popup(&mut errors, config);
    validate_port(&mut errors, config);
    validate_logging(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_popup(errors: &mut Vec<String>, config: &CrxConfig) {
    let popup = &config.popup;
    check_bounds(errors, "popup.resize_interval_ms", popup.resize_interval_ms, 50, 10_000);
    check_bounds(errors, "popup.anchor_offset_y", popup.anchor_offset_y, 0.0, 500.0);
    check_bounds(errors, "popup.default_width", popup.default_width, 1.0, 4096.0);
    check_bounds(errors, "popup.default_height", popup.default_height, 1.0, 4096.0);

    if Color::from_hex(&popup.background_color).is_none() {
        errors.push(format!(
            "popup.background_color = {:?} is not a hex color",
            popup.background_color
        ));
    }
}

fn validate_port(errors: &mut Vec<String>, config: &CrxConfig) {
    let port = &config.port;
    check_not_empty(errors, "port.disconnect_prefix", &port.disconnect_prefix);
    check_not_empty(errors, "port.postmessage_prefix", &port.postmessage_prefix);
    if port.disconnect_prefix == port.postmessage_prefix {
        errors.push("port.disconnect_prefix and port.postmessage_prefix must differ".into());
    }
}

fn validate_logging(errors: &mut Vec<String>, config: &CrxConfig) {
    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(format!(
            "logging.level = {:?} must be one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }
}
