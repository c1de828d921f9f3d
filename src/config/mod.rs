//! Process configuration.
//!
//! Values come from, highest precedence first: command-line flags, `MF_*`
//! environment variables, a TOML config file, then built-in defaults. The
//! config file is `--config` when given, else
//! `~/.config/sidekick/config.toml` if it exists.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::rules::RuleSource;

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_REFRESH_INTERVAL: &str = "30m";

/// Every setting is optional so that layers can be merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_endpoint: Option<String>,
    pub api_key: Option<String>,
    pub killfile_path: Option<PathBuf>,
    pub killfile_url: Option<String>,
    pub log_level: Option<String>,
    pub refresh_interval: Option<String>,
}

impl Config {
    /// Load the config file.
    ///
    /// An explicit path must exist. The default path is optional: when it
    /// is missing an empty configuration is returned.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// `~/.config/sidekick/config.toml` (platform config dir)
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("sidekick").join("config.toml"))
    }

    /// Overlay `other` on top of `self`; values set in `other` win.
    pub fn merge(self, other: Config) -> Config {
        Config {
            api_endpoint: other.api_endpoint.or(self.api_endpoint),
            api_key: other.api_key.or(self.api_key),
            killfile_path: other.killfile_path.or(self.killfile_path),
            killfile_url: other.killfile_url.or(self.killfile_url),
            log_level: other.log_level.or(self.log_level),
            refresh_interval: other.refresh_interval.or(self.refresh_interval),
        }
    }

    /// Endpoint and API key for the Miniflux instance.
    pub fn credentials(&self) -> Result<(Url, String), ConfigError> {
        let endpoint = non_empty(&self.api_endpoint).ok_or(ConfigError::Missing("api_endpoint"))?;
        let api_key = non_empty(&self.api_key).ok_or(ConfigError::Missing("api_key"))?;

        let endpoint = Url::parse(endpoint).map_err(|e| ConfigError::InvalidUrl {
            key: "api_endpoint",
            source: e,
        })?;
        Ok((endpoint, api_key.to_string()))
    }

    /// The killfile to read. A URL takes precedence over a path.
    pub fn killfile_source(&self) -> Result<RuleSource, ConfigError> {
        if let Some(url) = non_empty(&self.killfile_url) {
            let url = Url::parse(url).map_err(|e| ConfigError::InvalidUrl {
                key: "killfile_url",
                source: e,
            })?;
            return Ok(RuleSource::Url(url));
        }

        match &self.killfile_path {
            Some(path) if !path.as_os_str().is_empty() => Ok(RuleSource::File(path.clone())),
            _ => Err(ConfigError::Missing("killfile_path or killfile_url")),
        }
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn refresh_interval(&self) -> &str {
        self.refresh_interval
            .as_deref()
            .unwrap_or(DEFAULT_REFRESH_INTERVAL)
    }

    /// `tracing` filter directive for the configured level. Unrecognized
    /// levels only let errors through.
    pub fn log_filter(&self) -> &'static str {
        match self.log_level().to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" | "warning" => "warn",
            _ => "error",
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Missing setting: {0}")]
    Missing(&'static str),

    #[error("Invalid URL for {key}: {source}")]
    InvalidUrl {
        key: &'static str,
        source: url::ParseError,
    },

    #[error("API key is not a valid header value")]
    InvalidApiKey,

    #[error("Invalid interval: {0}. Use a format like '30s', '15m', '1h' or '1d'")]
    InvalidInterval(String),
}
