use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::app::error::Result;
use crate::client::{FeedReader, MinifluxClient};
use crate::config::Config;
use crate::filter::FilterService;
use crate::rules::{RuleRepository, RuleSource};

pub struct AppContext {
    pub client: Arc<dyn FeedReader + Send + Sync>,
    /// Used to fetch remote killfiles.
    pub http: reqwest::Client,
    pub killfile: RuleSource,
}

impl AppContext {
    pub fn new(config: &Config) -> Result<Self> {
        let (endpoint, api_key) = config.credentials()?;
        let client: Arc<dyn FeedReader + Send + Sync> =
            Arc::new(MinifluxClient::new(endpoint, &api_key)?);

        Self::with_client(config, client)
    }

    pub fn with_client(config: &Config, client: Arc<dyn FeedReader + Send + Sync>) -> Result<Self> {
        Ok(Self {
            client,
            http: killfile_http_client()?,
            killfile: config.killfile_source()?,
        })
    }

    /// Checks the API key by asking who it belongs to.
    pub async fn verify_credentials(&self) -> Result<()> {
        let user = self.client.me().await?;
        info!(
            username = %user.username,
            user_id = user.id,
            is_admin = user.is_admin,
            "user successfully logged in"
        );
        Ok(())
    }

    /// A filter service with the killfile loaded.
    pub async fn filter_service(&self) -> FilterService {
        let mut rules = RuleRepository::new();
        rules.load(&self.killfile, &self.http).await;
        FilterService::new(self.client.clone(), rules)
    }
}

pub fn killfile_http_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .user_agent(concat!("sidekick/", env!("CARGO_PKG_VERSION")))
        .build()?)
}
