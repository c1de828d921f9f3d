use std::collections::BTreeSet;

use tracing::info;

use super::extractor::extract;
use super::matcher::Matcher;
use super::selector::applies;
use crate::domain::{Entry, Feed};
use crate::rules::{Attribute, Rule};

/// Ids of entries a pass would mark as read.
pub type KillSet = BTreeSet<i64>;

/// Joins rules with feed entries.
#[derive(Debug, Default)]
pub struct Evaluator {
    matcher: Matcher,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any rule targets `feed`, i.e. whether its entries are needed.
    pub fn is_applicable(feed: &Feed, rules: &[Rule]) -> bool {
        rules.iter().any(|rule| applies(rule, feed))
    }

    /// Entries of `feed` killed by at least one rule.
    ///
    /// Rules are walked in order. Once one rule selects the feed, every
    /// later rule is treated as selecting it too, whatever its own
    /// selector says.
    pub fn evaluate(&mut self, feed: &Feed, entries: &[Entry], rules: &[Rule]) -> KillSet {
        let mut killed = KillSet::new();
        let mut applicable = false;

        for rule in rules {
            applicable = applicable || applies(rule, feed);
            if !applicable {
                continue;
            }

            for entry in entries {
                if self.rule_matches(entry, rule) {
                    info!(
                        entry_id = entry.id,
                        feed_id = feed.id,
                        rule = %rule,
                        "entry matches rules in the killfile"
                    );
                    killed.insert(entry.id);
                }
            }
        }

        killed
    }

    /// Whether every rule matches `entry`. Selectors are not consulted.
    pub fn satisfies_all(&mut self, entry: &Entry, rules: &[Rule]) -> bool {
        rules.iter().all(|rule| self.rule_matches(entry, rule))
    }

    /// Whether a single rule kills `entry`. Tag rules need only one tag to match.
    pub fn rule_matches(&mut self, entry: &Entry, rule: &Rule) -> bool {
        let targets = extract(entry, &rule.attribute);
        if rule.attribute == Attribute::Tag {
            targets
                .into_iter()
                .any(|tag| self.matcher.matches(&rule.operator, &rule.pattern, tag))
        } else {
            let target = targets.first().copied().unwrap_or_default();
            self.matcher.matches(&rule.operator, &rule.pattern, target)
        }
    }
}
