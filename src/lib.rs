//! # Sidekick
//!
//! Marks Miniflux entries as read when they match a killfile.
//!
//! ## Architecture
//!
//! ```text
//! killfile → Parser → RuleRepository → Evaluator ← Feeds/Entries (Miniflux API)
//!                                          ↓
//!                                  entries marked read
//! ```
//!
//! A killfile holds one rule per line in the newsboat format:
//!
//! ```text
//! ignore-article "http://example.com/feed.xml" "title =~ (?i)sponsored"
//! ignore-article * `tag # podcast,(?i)ads`
//! ignore-article "category:News, Tech" "author !# Alice"
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # Validate a killfile
//! sidekick --killfile-path ./killfile check
//!
//! # See what would be marked read
//! MF_API_ENDPOINT=https://rss.example.com MF_API_KEY=... \
//!     sidekick --killfile-path ./killfile run --simulate
//!
//! # Filter every 30 minutes
//! sidekick --killfile-path ./killfile daemon --interval 30m
//! ```

/// Application context and error handling.
///
/// [`AppContext`](app::AppContext) wires the Miniflux client, the
/// killfile source and the HTTP client used to fetch remote killfiles.
pub mod app;

/// Command-line interface using clap.
///
/// - `run [--simulate]` - One filter pass
/// - `daemon [--interval]` - Scheduled filter passes
/// - `check` - Parse the killfile offline
pub mod cli;

/// Miniflux API access.
///
/// - [`FeedReader`](client::FeedReader): Async trait for the operations the filter job needs
/// - [`MinifluxClient`](client::MinifluxClient): reqwest-based implementation
pub mod client;

/// Layered configuration: flags, `MF_*` environment variables, TOML file.
pub mod config;

/// Interval runner that reloads the killfile before every pass.
pub mod daemon;

/// Feed reader data: [`Feed`](domain::Feed), [`Entry`](domain::Entry), [`User`](domain::User).
pub mod domain;

/// Rule matching.
///
/// - [`selector`](filter::selector): which feeds a rule targets
/// - [`extractor`](filter::extractor): which entry text a rule reads
/// - [`Matcher`](filter::Matcher): regex and term-list operators
/// - [`Evaluator`](filter::Evaluator): kill sets for a feed
/// - [`FilterService`](filter::FilterService): the filter job
pub mod filter;

/// Killfile parsing and the in-memory rule set.
pub mod rules;
