use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Feed {
    pub id: i64,
    pub feed_url: String,
    #[serde(default)]
    pub site_url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: Category,
}

impl Feed {
    pub fn new(id: i64, feed_url: impl Into<String>) -> Self {
        Self {
            id,
            feed_url: feed_url.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, title: impl Into<String>) -> Self {
        self.category.title = title.into();
        self
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.feed_url
        } else {
            &self.title
        }
    }
}

/// The account the API key belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_api_feed() {
        let json = r#"{
            "id": 42,
            "user_id": 1,
            "feed_url": "https://example.com/feed.xml",
            "site_url": "https://example.com",
            "title": "Example",
            "category": {"id": 3, "title": "News", "user_id": 1}
        }"#;
        let feed: Feed = serde_json::from_str(json).unwrap();
        assert_eq!(feed.id, 42);
        assert_eq!(feed.feed_url, "https://example.com/feed.xml");
        assert_eq!(feed.category.title, "News");
    }

    #[test]
    fn test_display_title_falls_back_to_url() {
        let feed = Feed::new(1, "https://example.com/feed.xml");
        assert_eq!(feed.display_title(), "https://example.com/feed.xml");

        let feed = Feed {
            title: "Example".into(),
            ..feed
        };
        assert_eq!(feed.display_title(), "Example");
    }
}
