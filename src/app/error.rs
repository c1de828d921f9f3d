use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum SidekickError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Entry not found: {0}")]
    EntryNotFound(i64),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0} killfile line(s) could not be parsed")]
    InvalidKillfile(usize),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SidekickError>;
