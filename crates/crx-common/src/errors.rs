use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("failed to serialize port message: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("port {0} is disconnected")]
    ChannelClosed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("failed to create window: {0}")]
    Create(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CrxError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Port(#[from] PortError),

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("popup.resize_interval_ms = 0".into());
        assert_eq!(
            err.to_string(),
            "config validation error: popup.resize_interval_ms = 0"
        );
    }

    #[test]
    fn port_error_display() {
        let err = PortError::ChannelClosed("abc-123".into());
        assert_eq!(err.to_string(), "port abc-123 is disconnected");
    }

    #[test]
    fn window_error_display() {
        let err = WindowError::Create("no display".into());
        assert_eq!(err.to_string(), "failed to create window: no display");
    }

    #[test]
    fn crx_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: CrxError = config_err.into();
        assert!(matches!(err, CrxError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn crx_error_from_port() {
        let err: CrxError = PortError::ChannelClosed("p1".into()).into();
        assert!(matches!(err, CrxError::Port(_)));
        assert!(err.to_string().contains("p1"));
    }

    #[test]
    fn crx_error_from_window() {
        let err: CrxError = WindowError::Create("denied".into()).into();
        assert!(matches!(err, CrxError::Window(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn crx_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: CrxError = io_err.into();
        assert!(matches!(err, CrxError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn crx_error_other() {
        let err = CrxError::Other("something went wrong".into());
        assert_eq!(err.to_string(), "something went wrong");
    }
}
