//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# crx-host configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[popup]
# resize_interval_ms = 500   # 50-10000
# anchor_offset_y = 40.0     # 0-500, distance below the opener's top edge
# default_width = 100.0      # 1-4096
# default_height = 100.0     # 1-4096
# background_color = "#FFFFFF"

[port]
# Both ends of a connection must use the same prefixes.
# disconnect_prefix = "CRX_PORT_DISCONNECT_"
# postmessage_prefix = "CRX_PORT_POSTMESSAGE_"

[logging]
# level = "info"             # trace, debug, info, warn, error
"##
    .to_string()
}
