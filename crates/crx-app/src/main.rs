mod cli;
mod ping;
#[cfg(feature = "native")]
mod popup;

use std::process::ExitCode;

use crx_common::{ConfigError, CrxError};
use crx_config::CrxConfig;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use cli::Command;

const DEFAULT_DIRECTIVE: &str = "crx=info";

/// Load the `--config` file if given, else the platform default.
fn load_config(args: &cli::Args) -> Result<CrxConfig, ConfigError> {
    match &args.config {
        Some(path) => {
            let config = crx_config::load_from_path(path)?;
            crx_config::validation::validate(&config)?;
            Ok(config)
        }
        None => crx_config::load_config(),
    }
}

/// CLI override first, then the config's level, then the default.
fn log_directive(args: &cli::Args, config: Option<&CrxConfig>) -> String {
    if let Some(directive) = &args.log_level {
        return directive.clone();
    }
    match config {
        Some(config) => format!("crx={}", config.logging.level.to_ascii_lowercase()),
        None => DEFAULT_DIRECTIVE.to_string(),
    }
}

fn init_logging(directive: &str) {
    let filter = EnvFilter::from_default_env();
    let filter = match directive.parse::<Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => match DEFAULT_DIRECTIVE.parse::<Directive>() {
            Ok(fallback) => filter.add_directive(fallback),
            Err(_) => filter,
        },
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(command: Command, config: &CrxConfig) -> Result<(), CrxError> {
    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

    match command {
        Command::Config => {
            println!("{}", crx_config::config_to_json(config));
            Ok(())
        }
        Command::Ping { count } => {
            let report = runtime.block_on(ping::run(config, count))?;
            println!(
                "{}/{} pongs, peer saw disconnect: {}",
                report.pongs, count, report.peer_saw_disconnect
            );
            if report.pongs == count && report.peer_saw_disconnect {
                Ok(())
            } else {
                Err(CrxError::Other("port round trip incomplete".into()))
            }
        }
        #[cfg(feature = "native")]
        Command::Popup { url } => {
            let _guard = runtime.enter();
            popup::run(config, url)
        }
    }
}

fn main() -> ExitCode {
    let args = cli::parse();

    let loaded = load_config(&args);
    init_logging(&log_directive(&args, loaded.as_ref().ok()));

    tracing::info!("crx-host v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        CrxConfig::default()
    });

    match run(args.command(), &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;

    use super::*;

    #[test]
    fn cli_level_wins() {
        let args = cli::Args::parse_from(["crx-host", "--log-level", "crx_runtime=trace"]);
        let config = CrxConfig::default();
        assert_eq!(log_directive(&args, Some(&config)), "crx_runtime=trace");
    }

    #[test]
    fn config_level_scoped_to_crx() {
        let args = cli::Args::parse_from(["crx-host"]);
        let mut config = CrxConfig::default();
        config.logging.level = "DEBUG".into();
        assert_eq!(log_directive(&args, Some(&config)), "crx=debug");
    }

    #[test]
    fn default_directive_without_config() {
        let args = cli::Args::parse_from(["crx-host"]);
        assert_eq!(log_directive(&args, None), DEFAULT_DIRECTIVE);
        assert!(DEFAULT_DIRECTIVE.parse::<Directive>().is_ok());
    }

    #[test]
    fn explicit_config_is_validated() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[popup]\nresize_interval_ms = 1").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let args = cli::Args::parse_from(["crx-host", "--config", path.as_str()]);
        assert!(matches!(load_config(&args), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn missing_explicit_config_is_reported() {
        let args = cli::Args::parse_from(["crx-host", "--config", "/nonexistent/crx.toml"]);
        assert!(matches!(load_config(&args), Err(ConfigError::FileNotFound(_))));
    }
}
