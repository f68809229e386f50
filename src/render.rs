//! Item rendering for the two output encodings.
//!
//! Everything here is a pure function of its inputs; nothing touches the
//! store or the output surface.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::comments::CommentInfo;
use crate::source::FeedItem;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));

const INSTAPAPER_ICON: &str =
    "https://staticinstapaper.s3.dualstack.us-west-2.amazonaws.com/img/favicon.png";

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Terminal,
    Markdown,
}

impl OutputMode {
    /// `[title](url)` or an OSC 8 terminal hyperlink.
    pub fn link(self, title: &str, url: &str, newline: bool) -> String {
        let mut out = match self {
            OutputMode::Terminal => format!("\x1b]8;;{url}\x1b\\{title}\x1b]8;;\x1b\\"),
            OutputMode::Markdown => format!("[{title}]({url})"),
        };
        if newline {
            out.push('\n');
        }
        out
    }

    /// Empty summaries render to nothing.
    pub fn summary(self, summary: &str, newline: bool) -> String {
        if summary.is_empty() {
            return String::new();
        }
        let mut out = summary.to_string();
        if newline {
            out.push_str(match self {
                OutputMode::Terminal => "\n",
                // hard break, then paragraph break
                OutputMode::Markdown => "  \n\n",
            });
        }
        out
    }
}

/// Remove every markup tag and trim surrounding whitespace.
pub fn strip_tags(markup: &str) -> String {
    TAG.replace_all(markup, "").trim().to_string()
}

/// The item's title, or its description without markup when the title is
/// empty.
pub fn display_title(item: &FeedItem) -> String {
    if item.title.is_empty() {
        strip_tags(&item.description)
    } else {
        item.title.clone()
    }
}

/// Everything needed to render one item.
#[derive(Debug, Clone, Copy)]
pub struct ItemView<'a> {
    pub item: &'a FeedItem,
    /// Rendered only when `Some` and non-empty.
    pub summary: Option<&'a str>,
    pub comments: Option<&'a CommentInfo>,
}

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    mode: OutputMode,
    instapaper: bool,
}

impl Renderer {
    pub fn new(mode: OutputMode, instapaper: bool) -> Self {
        Self { mode, instapaper }
    }

    /// Badges, then the title link, then the summary.
    pub fn render(&self, view: ItemView<'_>) -> String {
        let mut out = String::new();

        if let Some(comments) = view.comments {
            out.push_str(&self.mode.link(comments.intensity().emoji(), &comments.url, false));
        }
        if self.instapaper && self.mode == OutputMode::Markdown {
            out.push_str(&instapaper_badge(&view.item.link));
        }

        out.push_str(&self.mode.link(&display_title(view.item), &view.item.link, true));

        if let Some(summary) = view.summary {
            out.push_str(&self.mode.summary(summary, true));
        }
        out
    }
}

fn instapaper_badge(link: &str) -> String {
    format!(
        "[<img height=\"16\" src=\"{INSTAPAPER_ICON}\">](https://www.instapaper.com/hello2?url={link})"
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
