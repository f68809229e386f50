//! Per-feed sections and the output surface they are flushed to.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::comments::is_aggregator;
use crate::render::OutputMode;
use crate::source::Feed;

const DEFAULT_FAVICON: &str = "🍵";
const AGGREGATOR_FAVICON: &str = "https://news.ycombinator.com/favicon.ico";

/// Rendered items for one feed source, flushed once the source is done.
#[derive(Debug, Clone)]
pub struct DigestSection {
    pub source_title: String,
    pub favicon_markup: String,
    pub rendered_items: Vec<String>,
}

impl DigestSection {
    pub fn for_feed(feed: &Feed, mode: OutputMode) -> Self {
        Self {
            source_title: feed.title.clone(),
            favicon_markup: favicon(feed, mode),
            rendered_items: Vec::new(),
        }
    }

    /// Empty strings are ignored so they cannot make a section non-empty.
    pub fn push(&mut self, rendered: String) {
        if !rendered.is_empty() {
            self.rendered_items.push(rendered);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rendered_items.is_empty()
    }

    pub fn header(&self) -> String {
        format!("\n### {}  {}\n", self.favicon_markup, self.source_title)
    }
}

/// Favicon markup shown before a section title. Terminal mode has none.
pub fn favicon(feed: &Feed, mode: OutputMode) -> String {
    if mode == OutputMode::Terminal {
        return String::new();
    }
    if feed.self_link.is_empty() {
        return DEFAULT_FAVICON.to_string();
    }
    let src = if is_aggregator(&feed.title) {
        AGGREGATOR_FAVICON.to_string()
    } else {
        match url::Url::parse(&feed.self_link).ok().and_then(|u| u.host_str().map(String::from)) {
            Some(host) => format!("https://www.google.com/s2/favicons?sz=32&domain={host}"),
            None => return DEFAULT_FAVICON.to_string(),
        }
    };
    format!("<img src=\"{src}\" width=\"32\" height=\"32\" />")
}

/// `{dir}/{prefix}{date}{suffix}.md`
pub fn markdown_path(dir: &Path, prefix: &str, date: NaiveDate, suffix: &str) -> PathBuf {
    dir.join(format!("{prefix}{}{suffix}.md", date.format("%Y-%m-%d")))
}

/// Open the day's markdown file for append, creating it if needed.
pub fn open_markdown(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Writes the digest, one section at a time, to a single sink.
///
/// In terminal mode every block (preamble, header, item batch) is printed as
/// its own line, so it gets one extra trailing newline.
pub struct DigestWriter<W: Write> {
    out: W,
    mode: OutputMode,
}

impl<W: Write> DigestWriter<W> {
    pub fn new(out: W, mode: OutputMode) -> Self {
        Self { out, mode }
    }

    /// Free-form block ahead of the sections (the weather line).
    pub fn write_preamble(&mut self, text: &str) -> io::Result<()> {
        self.emit(text)?;
        self.out.flush()
    }

    /// Emit header and items, or nothing at all for an empty section.
    pub fn write_section(&mut self, section: &DigestSection) -> io::Result<bool> {
        if section.is_empty() {
            return Ok(false);
        }
        self.emit(&section.header())?;
        self.emit(&section.rendered_items.concat())?;
        self.out.flush()?;
        Ok(true)
    }

    fn emit(&mut self, block: &str) -> io::Result<()> {
        self.out.write_all(block.as_bytes())?;
        if self.mode == OutputMode::Terminal {
            self.out.write_all(b"\n")?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
