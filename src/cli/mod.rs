pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "sidekick")]
#[command(about = "Marks Miniflux entries as read using a killfile", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Settings shared by every command. Each overrides the config file.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Path to a TOML config file
    #[arg(long, env = "MF_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// API key used for authentication
    #[arg(long, env = "MF_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the Miniflux instance
    #[arg(long, env = "MF_API_ENDPOINT", global = true)]
    pub api_endpoint: Option<String>,

    /// Path to a local killfile
    #[arg(long, env = "MF_KILLFILE_PATH", global = true)]
    pub killfile_path: Option<PathBuf>,

    /// URL of a remote killfile (takes precedence over --killfile-path)
    #[arg(long, env = "MF_KILLFILE_URL", global = true)]
    pub killfile_url: Option<String>,

    /// Level to filter logs at: debug, info, warn, error
    #[arg(long, env = "MF_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,
}

impl GlobalArgs {
    pub fn to_config(&self) -> Config {
        Config {
            api_endpoint: self.api_endpoint.clone(),
            api_key: self.api_key.clone(),
            killfile_path: self.killfile_path.clone(),
            killfile_url: self.killfile_url.clone(),
            log_level: self.log_level.clone(),
            refresh_interval: None,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one filter pass
    Run {
        /// Log matching entries without marking them read
        #[arg(long, visible_alias = "dry-run")]
        simulate: bool,
    },
    /// Run a filter pass at a fixed interval
    Daemon {
        /// Interval between passes (e.g., "30m", "1h", "1d")
        #[arg(short, long, env = "MF_REFRESH_INTERVAL")]
        interval: Option<String>,

        /// Skip the pass on start
        #[arg(long)]
        no_initial_run: bool,

        /// Log matching entries without marking them read
        #[arg(long, visible_alias = "dry-run")]
        simulate: bool,
    },
    /// Parse the killfile and print its rules
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_global_flags() {
        let cli = Cli::try_parse_from([
            "sidekick",
            "run",
            "--dry-run",
            "--api-key",
            "secret",
            "--killfile-path",
            "/tmp/killfile",
        ])
        .unwrap();

        assert!(matches!(cli.command, Commands::Run { simulate: true }));
        let config = cli.global.to_config();
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.killfile_path, Some(PathBuf::from("/tmp/killfile")));
    }

    #[test]
    fn test_parse_daemon() {
        let cli = Cli::try_parse_from(["sidekick", "daemon", "-i", "15m", "--no-initial-run"])
            .unwrap();
        match cli.command {
            Commands::Daemon {
                interval,
                no_initial_run,
                simulate,
            } => {
                assert_eq!(interval.as_deref(), Some("15m"));
                assert!(no_initial_run);
                assert!(!simulate);
            }
            _ => panic!("expected daemon command"),
        }
    }
}
