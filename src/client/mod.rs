pub mod miniflux;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{Entry, EntryStatus, Feed, User};

pub use miniflux::MinifluxClient;

/// Operations the filter job needs from the feed reader.
#[async_trait]
pub trait FeedReader {
    async fn me(&self) -> Result<User>;

    async fn feeds(&self) -> Result<Vec<Feed>>;

    async fn unread_entries(&self, feed_id: i64) -> Result<Vec<Entry>>;

    async fn entry(&self, entry_id: i64) -> Result<Entry>;

    async fn update_entries(&self, entry_ids: &[i64], status: EntryStatus) -> Result<()>;
}
