//! The item and feed types shared by every fetcher.
//!
//! A [`FeedItem`] is produced fresh on each run and never persisted directly;
//! only its `link` survives, as the key of a seen record.

/// A single feed entry, normalised from the wire format.
///
/// Missing fields are mapped to empty strings rather than `Option`s because
/// the digest treats "absent" and "empty" identically: an empty title falls
/// back to the stripped description, an empty description has no comment
/// badge.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct FeedItem {
    /// Headline. May be empty (Mastodon-style feeds).
    pub title: String,

    /// URL of the item. This is the item's identity in the seen store.
    pub link: String,

    /// Raw description markup.
    pub description: String,
}

impl FeedItem {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            description: description.into(),
        }
    }
}

/// A fetched feed: its title and self link, plus items in fetch order.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Feed {
    pub title: String,
    /// The feed's own URL as it advertises it (`atom:link rel="self"`).
    /// Empty when absent; drives the section favicon.
    pub self_link: String,
    pub items: Vec<FeedItem>,
}

impl Feed {
    /// The first `limit` items in fetch order.
    ///
    /// A limit of zero yields nothing.
    pub fn limited(&self, limit: usize) -> &[FeedItem] {
        &self.items[..limit.min(self.items.len())]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_with(n: usize) -> Feed {
        Feed {
            title: "Test".into(),
            self_link: String::new(),
            items: (0..n)
                .map(|i| FeedItem::new(format!("t{i}"), format!("https://example.com/{i}"), ""))
                .collect(),
        }
    }

    #[test]
    fn limit_takes_first_items_in_fetch_order() {
        let feed = feed_with(5);
        let items = feed.limited(2);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].link, "https://example.com/0");
        assert_eq!(items[1].link, "https://example.com/1");
    }

    #[test]
    fn zero_limit_means_no_items() {
        assert!(feed_with(3).limited(0).is_empty());
    }

    #[test]
    fn limit_larger_than_feed_takes_everything() {
        assert_eq!(feed_with(3).limited(10).len(), 3);
    }
}
