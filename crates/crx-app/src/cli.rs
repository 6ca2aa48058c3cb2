use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// crx-host: runtime host for Chrome-extension ports and popups.
#[derive(Parser, Debug)]
#[command(name = "crx-host", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log directive override (e.g. debug, crx_runtime=trace).
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the effective configuration as JSON.
    Config,

    /// Connect two ports in-process and exchange ping/pong messages.
    Ping {
        /// Round trips before disconnecting.
        #[arg(short = 'n', long, default_value_t = 3)]
        count: u32,
    },

    /// Open a native popup showing URL.
    #[cfg(feature = "native")]
    Popup { url: String },
}

impl Args {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Ping { count: 3 })
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_ping() {
        let args = Args::parse_from(["crx-host"]);
        assert_eq!(args.command(), Command::Ping { count: 3 });
        assert!(args.config.is_none());
        assert!(args.log_level.is_none());
    }

    #[test]
    fn parses_overrides_and_subcommand() {
        let args = Args::parse_from([
            "crx-host",
            "--config",
            "/tmp/crx.toml",
            "--log-level",
            "debug",
            "ping",
            "-n",
            "5",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/crx.toml")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.command(), Command::Ping { count: 5 });
    }

    #[test]
    fn config_subcommand() {
        let args = Args::parse_from(["crx-host", "config"]);
        assert_eq!(args.command(), Command::Config);
    }
}
