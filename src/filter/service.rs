use std::sync::Arc;

use tracing::{error, info};

use super::evaluator::Evaluator;
use crate::app::Result;
use crate::client::FeedReader;
use crate::domain::{Entry, EntryStatus};
use crate::rules::{RuleRepository, RuleSource};

/// Outcome of one filter pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobSummary {
    /// Feeds at least one rule applied to
    pub feeds_checked: usize,
    /// Feeds whose unread entries could not be fetched
    pub feeds_failed: usize,
    /// Entries marked read, or that would be in simulation
    pub entries_killed: usize,
}

/// Runs the killfile against every subscribed feed.
pub struct FilterService {
    client: Arc<dyn FeedReader + Send + Sync>,
    rules: RuleRepository,
}

impl FilterService {
    pub fn new(client: Arc<dyn FeedReader + Send + Sync>, rules: RuleRepository) -> Self {
        Self { client, rules }
    }

    pub fn rules(&self) -> &RuleRepository {
        &self.rules
    }

    /// Reloads the killfile, keeping the current rules if it cannot be read.
    pub async fn reload_rules(&mut self, source: &RuleSource, http: &reqwest::Client) {
        self.rules.load(source, http).await;
    }

    /// Marks every unread entry matched by the killfile as read.
    ///
    /// With `simulation` set, matched entries are only logged. A failed
    /// status update aborts the pass; updates already sent are kept.
    pub async fn run_filter_job(&self, simulation: bool) -> Result<JobSummary> {
        let rules = self.rules.rules();
        let mut summary = JobSummary::default();

        let feeds = self.client.feeds().await.inspect_err(|e| {
            error!(error = %e, "failed to fetch feeds");
        })?;

        let mut evaluator = Evaluator::new();

        for feed in &feeds {
            if !Evaluator::is_applicable(feed, rules) {
                continue;
            }
            summary.feeds_checked += 1;

            // Only fetched for feeds some rule applies to
            let entries = match self.client.unread_entries(feed.id).await {
                Ok(entries) => entries,
                Err(e) => {
                    error!(feed_id = feed.id, error = %e, "failed to fetch unread entries");
                    summary.feeds_failed += 1;
                    continue;
                }
            };

            let killed = evaluator.evaluate(feed, &entries, rules);
            if killed.is_empty() {
                continue;
            }

            for &entry_id in &killed {
                if simulation {
                    let entry = self.client.entry(entry_id).await.inspect_err(|e| {
                        error!(entry_id, error = %e, "failed to fetch entry");
                    })?;
                    info!(
                        entry_id,
                        feed_id = feed.id,
                        entry_title = %entry.title,
                        "would set status to read"
                    );
                } else {
                    info!(entry_id, feed_id = feed.id, "set status to read");
                    self.client
                        .update_entries(&[entry_id], EntryStatus::Read)
                        .await
                        .inspect_err(|e| {
                            error!(entry_id, error = %e, "error on updating the feed entries");
                        })?;
                }
                summary.entries_killed += 1;
            }

            info!(
                feed_id = feed.id,
                feed = %feed.display_title(),
                affected = killed.len(),
                simulation,
                "marked all matched feed items as read"
            );
        }

        info!(
            feeds = feeds.len(),
            checked = summary.feeds_checked,
            failed = summary.feeds_failed,
            killed = summary.entries_killed,
            simulation,
            "filter job finished"
        );
        Ok(summary)
    }

    /// Whether `entry` is matched by every rule in the killfile.
    pub fn satisfies_all_rules(&self, entry: &Entry) -> bool {
        Evaluator::new().satisfies_all(entry, self.rules.rules())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::app::SidekickError;
    use crate::domain::{Feed, User};

    #[derive(Default)]
    struct MemoryReader {
        feeds: Vec<Feed>,
        entries: HashMap<i64, Vec<Entry>>,
        broken_feeds: Vec<i64>,
        fail_updates: bool,
        entry_requests: Mutex<Vec<i64>>,
        updated: Mutex<Vec<(i64, EntryStatus)>>,
    }

    impl MemoryReader {
        fn with_feed(mut self, feed: Feed, entries: Vec<Entry>) -> Self {
            self.entries.insert(feed.id, entries);
            self.feeds.push(feed);
            self
        }

        fn updated(&self) -> Vec<(i64, EntryStatus)> {
            self.updated.lock().unwrap().clone()
        }

        fn entry_requests(&self) -> Vec<i64> {
            self.entry_requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FeedReader for MemoryReader {
        async fn me(&self) -> Result<User> {
            Ok(User {
                id: 1,
                username: "admin".into(),
                is_admin: true,
            })
        }

        async fn feeds(&self) -> Result<Vec<Feed>> {
            Ok(self.feeds.clone())
        }

        async fn unread_entries(&self, feed_id: i64) -> Result<Vec<Entry>> {
            if self.broken_feeds.contains(&feed_id) {
                return Err(SidekickError::Other("feed unavailable".into()));
            }
            Ok(self.entries.get(&feed_id).cloned().unwrap_or_default())
        }

        async fn entry(&self, entry_id: i64) -> Result<Entry> {
            self.entry_requests.lock().unwrap().push(entry_id);
            self.entries
                .values()
                .flatten()
                .find(|e| e.id == entry_id)
                .cloned()
                .ok_or(SidekickError::EntryNotFound(entry_id))
        }

        async fn update_entries(&self, entry_ids: &[i64], status: EntryStatus) -> Result<()> {
            if self.fail_updates {
                return Err(SidekickError::Api {
                    status: 500,
                    message: "boom".into(),
                });
            }
            let mut updated = self.updated.lock().unwrap();
            updated.extend(entry_ids.iter().map(|&id| (id, status)));
            Ok(())
        }
    }

    const KILLFILE: &str = r#"
ignore-article "example.com" "title # Moon"
ignore-article "category:Podcasts" "tag # (?i)ads"
"#;

    fn reader() -> MemoryReader {
        MemoryReader::default()
            .with_feed(
                Feed::new(1, "http://example.com/feed.xml"),
                vec![
                    Entry::new(10, 1).with_title("Moon entry"),
                    Entry::new(11, 1).with_title("Sun entry"),
                ],
            )
            .with_feed(
                Feed::new(2, "https://pods.example.org/rss").with_category("podcasts"),
                vec![
                    Entry::new(20, 2).with_tags(["ADS", "talk"]),
                    Entry::new(21, 2).with_tags(["talk"]),
                ],
            )
            .with_feed(
                Feed::new(3, "https://unrelated.org/atom"),
                vec![Entry::new(30, 3).with_title("Moon entry")],
            )
    }

    fn service(reader: Arc<MemoryReader>) -> FilterService {
        let mut rules = RuleRepository::new();
        rules.load_str(KILLFILE);
        FilterService::new(reader, rules)
    }

    #[tokio::test]
    async fn test_run_marks_matched_entries_read() {
        let reader = Arc::new(reader());
        let summary = service(reader.clone()).run_filter_job(false).await.unwrap();

        assert_eq!(
            reader.updated(),
            vec![(10, EntryStatus::Read), (20, EntryStatus::Read)]
        );
        assert_eq!(
            summary,
            JobSummary {
                feeds_checked: 2,
                feeds_failed: 0,
                entries_killed: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_simulation_does_not_mutate() {
        let reader = Arc::new(reader());
        let summary = service(reader.clone()).run_filter_job(true).await.unwrap();

        assert!(reader.updated().is_empty());
        assert_eq!(reader.entry_requests(), vec![10, 20]);
        assert_eq!(summary.entries_killed, 2);
    }

    #[tokio::test]
    async fn test_entry_fetch_failure_skips_feed() {
        let mut reader = reader();
        reader.broken_feeds.push(1);
        let reader = Arc::new(reader);

        let summary = service(reader.clone()).run_filter_job(false).await.unwrap();

        assert_eq!(reader.updated(), vec![(20, EntryStatus::Read)]);
        assert_eq!(summary.feeds_failed, 1);
    }

    #[tokio::test]
    async fn test_update_failure_aborts_job() {
        let mut reader = reader();
        reader.fail_updates = true;
        let reader = Arc::new(reader);

        let result = service(reader.clone()).run_filter_job(false).await;

        assert!(matches!(result, Err(SidekickError::Api { status: 500, .. })));
        assert!(reader.updated().is_empty());
    }

    #[tokio::test]
    async fn test_empty_killfile_touches_nothing() {
        let reader = Arc::new(reader());
        let svc = FilterService::new(reader.clone(), RuleRepository::new());

        let summary = svc.run_filter_job(false).await.unwrap();

        assert_eq!(summary, JobSummary::default());
        assert!(reader.updated().is_empty());
    }

    #[test]
    fn test_satisfies_all_rules() {
        let svc = service(Arc::new(MemoryReader::default()));
        let both = Entry::new(1, 1).with_title("Moon").with_tags(["ads"]);
        let one = Entry::new(2, 1).with_title("Moon");

        assert!(svc.satisfies_all_rules(&both));
        assert!(!svc.satisfies_all_rules(&one));
    }
}
