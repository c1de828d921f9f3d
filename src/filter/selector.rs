use crate::domain::Feed;
use crate::rules::Rule;

const WILDCARD: &str = "*";
const CATEGORY_PREFIX: &str = "category:";

/// Whether `rule` targets `feed`.
///
/// A selector is the wildcard `*`, a substring of the feed URL, or
/// `category:` followed by comma-separated category titles.
pub fn applies(rule: &Rule, feed: &Feed) -> bool {
    if rule.url == WILDCARD || feed.feed_url.contains(rule.url.as_str()) {
        return true;
    }

    match category_list(&rule.url) {
        Some(list) => {
            let category = feed.category.title.to_lowercase();
            list.split(',')
                .any(|name| name.trim().to_lowercase() == category)
        }
        None => false,
    }
}

fn category_list(selector: &str) -> Option<&str> {
    let prefix = selector.get(..CATEGORY_PREFIX.len())?;
    if prefix.eq_ignore_ascii_case(CATEGORY_PREFIX) {
        Some(&selector[CATEGORY_PREFIX.len()..])
    } else {
        None
    }
}
