use std::fmt;
use std::path::PathBuf;

use url::Url;

use crate::app::Result;

/// Where killfile text is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
    File(PathBuf),
    Url(Url),
}

impl RuleSource {
    pub async fn read(&self, http: &reqwest::Client) -> Result<String> {
        match self {
            RuleSource::File(path) => Ok(tokio::fs::read_to_string(path).await?),
            RuleSource::Url(url) => {
                let response = http.get(url.clone()).send().await?;
                response.error_for_status_ref()?;
                Ok(response.text().await?)
            }
        }
    }
}

impl fmt::Display for RuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleSource::File(path) => write!(f, "{}", path.display()),
            RuleSource::Url(url) => write!(f, "{}", url),
        }
    }
}
