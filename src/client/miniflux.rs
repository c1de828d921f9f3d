use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::app::{Result, SidekickError};
use crate::client::FeedReader;
use crate::config::ConfigError;
use crate::domain::{Entry, EntryStatus, Feed, User};

const AUTH_HEADER: &str = "X-Auth-Token";

#[derive(Debug, Deserialize)]
struct EntryResultSet {
    #[serde(default)]
    total: i64,
    #[serde(default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Serialize)]
struct EntriesStatusUpdate<'a> {
    entry_ids: &'a [i64],
    status: EntryStatus,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error_message: String,
}

/// Client for the Miniflux REST API.
pub struct MinifluxClient {
    client: Client,
    endpoint: Url,
}

impl MinifluxClient {
    pub fn new(endpoint: Url, api_key: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut token =
            HeaderValue::from_str(api_key).map_err(|_| ConfigError::InvalidApiKey)?;
        token.set_sensitive(true);
        headers.insert(AUTH_HEADER, token);

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("sidekick/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self { client, endpoint })
    }

    fn url(&self, path: &str) -> Result<Url> {
        // Keep any path prefix of the endpoint, e.g. https://host/miniflux/
        let base = self.endpoint.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}/v1/{}", base, path))?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        Ok(self.client.request(method, self.url(path)?))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        if status.is_success() {
            return Ok(body);
        }

        let message = serde_json::from_slice::<ApiError>(&body)
            .map(|e| e.error_message)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected response")
                    .to_string()
            });
        Err(SidekickError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.send(self.request(Method::GET, path)?).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl FeedReader for MinifluxClient {
    async fn me(&self) -> Result<User> {
        self.get_json("me").await
    }

    async fn feeds(&self) -> Result<Vec<Feed>> {
        self.get_json("feeds").await
    }

    async fn unread_entries(&self, feed_id: i64) -> Result<Vec<Entry>> {
        let path = format!("feeds/{}/entries?status={}", feed_id, EntryStatus::Unread);
        let result: EntryResultSet = self.get_json(&path).await?;
        tracing::debug!(feed_id, total = result.total, "fetched unread entries");
        Ok(result.entries)
    }

    async fn entry(&self, entry_id: i64) -> Result<Entry> {
        match self.get_json(&format!("entries/{}", entry_id)).await {
            Err(SidekickError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(SidekickError::EntryNotFound(entry_id))
            }
            other => other,
        }
    }

    async fn update_entries(&self, entry_ids: &[i64], status: EntryStatus) -> Result<()> {
        let body = serde_json::to_vec(&EntriesStatusUpdate { entry_ids, status })?;
        let request = self
            .request(Method::PUT, "entries")?
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        self.send(request).await?;
        Ok(())
    }
}
