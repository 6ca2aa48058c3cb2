use std::io;
use std::path::{Path, PathBuf};

use crx_common::ConfigError;
use tracing::info;

use super::template::default_config_toml;

const APP_DIR: &str = "crx-host";
const FILE_NAME: &str = "config.toml";

/// `<platform config dir>/crx-host/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(FILE_NAME))
        .ok_or_else(|| ConfigError::ParseError("no platform config directory".into()))
}

/// Write the commented default config to `path`, creating parent
/// directories as needed.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let io_error = |what: &str, e: io::Error| ConfigError::ParseError(format!("{what} {}: {e}", path.display()));

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| io_error("cannot create directory for", e))?;
    }
    std::fs::write(path, default_config_toml()).map_err(|e| io_error("cannot write", e))?;

    info!(path = %path.display(), "wrote default config");
    Ok(())
}
