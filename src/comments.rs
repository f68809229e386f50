//! Comment-intensity badges for discussion-aggregator feeds.
//!
//! Aggregator feeds (hnrss-style) embed the discussion link and comment
//! count as labelled text inside each item's description:
//!
//! ```text
//! <p>Comments URL: <a href="https://news.ycombinator.com/item?id=1">…</a></p>
//! <p># Comments: 42</p>
//! ```
//!
//! The values are located by searching for the label text, never by offset.

/// Substring of a feed title that marks it as an aggregator feed.
pub const AGGREGATOR_MARKER: &str = "Hacker News";

const COMMENTS_URL_LABEL: &str = "Comments URL:";
const COMMENT_COUNT_LABEL: &str = "Comments:";

/// Counts at or above this are "high" intensity.
const HIGH_INTENSITY_THRESHOLD: u64 = 100;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Intensity {
    Low,
    High,
}

impl Intensity {
    pub fn from_count(count: u64) -> Self {
        if count < HIGH_INTENSITY_THRESHOLD {
            Intensity::Low
        } else {
            Intensity::High
        }
    }

    /// Link label used for the badge.
    pub fn emoji(self) -> &'static str {
        match self {
            Intensity::Low => "💬 ",
            Intensity::High => "🔥 ",
        }
    }
}

/// Discussion metadata found in an item.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CommentInfo {
    pub url: String,
    pub count: u64,
}

impl CommentInfo {
    pub fn intensity(&self) -> Intensity {
        Intensity::from_count(self.count)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Extraction {
    Found(CommentInfo),
    Missing,
}

/// Pulls discussion metadata out of an item description.
pub trait CommentExtractor {
    fn extract(&self, description: &str) -> Extraction;
}

/// Searches for the `Comments URL:` and `Comments:` labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelExtractor;

impl CommentExtractor for LabelExtractor {
    fn extract(&self, description: &str) -> Extraction {
        let Some(url) = find_comments_url(description) else {
            return Extraction::Missing;
        };
        let Some(count) = find_comment_count(description) else {
            return Extraction::Missing;
        };
        Extraction::Found(CommentInfo { url, count })
    }
}

/// Whether items of a feed with this title get a comment badge.
pub fn is_aggregator(feed_title: &str) -> bool {
    feed_title.contains(AGGREGATOR_MARKER)
}

fn value_after<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    text.find(label)
        .map(|at| text[at + label.len()..].trim_start())
}

fn find_comments_url(description: &str) -> Option<String> {
    let mut rest = value_after(description, COMMENTS_URL_LABEL)?;
    // Value may be wrapped in an anchor.
    if let Some(after) = rest.strip_prefix("<a href=") {
        rest = after.trim_start_matches(['"', '\'']);
    }
    let end = rest
        .find(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>'))
        .unwrap_or(rest.len());
    let url = &rest[..end];
    (!url.is_empty()).then(|| url.to_string())
}

/// Leading digits after the label; anything unparseable counts as zero.
fn find_comment_count(description: &str) -> Option<u64> {
    let rest = value_after(description, COMMENT_COUNT_LABEL)?;
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    Some(digits.parse().unwrap_or(0))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
