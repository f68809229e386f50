//! One digest run: every feed source, every item, in order.
//!
//! Feeds are processed sequentially and items within a feed in fetch order.
//! A feed that cannot be fetched or an item whose summary fails never stops
//! the run; a store failure other than a duplicate key always does.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::classify::{Classifier, Verdict};
use crate::comments::{is_aggregator, CommentExtractor, CommentInfo, Extraction};
use crate::config::{FeedSource, RunContext};
use crate::digest::{DigestSection, DigestWriter};
use crate::render::{ItemView, Renderer};
use crate::source::{Feed, FeedFetcher, FeedItem};
use crate::store::{SeenStore, StoreError};
use crate::summarize::{summarize_or_empty, Summarizer};

/// Counters for the end-of-run log line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub new: usize,
    pub repeat: usize,
    pub skipped: usize,
    pub failed_feeds: usize,
    pub sections: usize,
}

pub struct Pipeline<'a> {
    ctx: RunContext,
    store: &'a SeenStore,
    fetcher: &'a dyn FeedFetcher,
    summarizer: &'a dyn Summarizer,
    extractor: &'a dyn CommentExtractor,
    renderer: Renderer,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        ctx: RunContext,
        store: &'a SeenStore,
        fetcher: &'a dyn FeedFetcher,
        summarizer: &'a dyn Summarizer,
        extractor: &'a dyn CommentExtractor,
        instapaper: bool,
    ) -> Self {
        Self {
            ctx,
            store,
            fetcher,
            summarizer,
            extractor,
            renderer: Renderer::new(ctx.mode, instapaper),
        }
    }

    pub fn run<W: Write>(
        &self,
        sources: &[FeedSource],
        writer: &mut DigestWriter<W>,
    ) -> Result<RunStats> {
        let classifier = Classifier::new(self.store, self.ctx.date);
        let mut stats = RunStats::default();

        for source in sources {
            let feed = match self.fetcher.fetch(&source.url) {
                Ok(feed) => feed,
                Err(e) => {
                    warn!(feed = %source.url, error = %e, "skipping feed");
                    stats.failed_feeds += 1;
                    continue;
                }
            };

            let section = self
                .process_feed(&classifier, source, &feed, &mut stats)
                .with_context(|| format!("seen store failed while processing {}", source.url))?;

            if writer
                .write_section(&section)
                .context("write digest section")?
            {
                stats.sections += 1;
            }
        }

        Ok(stats)
    }

    fn process_feed(
        &self,
        classifier: &Classifier<'_>,
        source: &FeedSource,
        feed: &Feed,
        stats: &mut RunStats,
    ) -> Result<DigestSection, StoreError> {
        let mut section = DigestSection::for_feed(feed, self.ctx.mode);
        let aggregator = is_aggregator(&feed.title);

        for item in feed.limited(source.limit) {
            if let Some(rendered) = self.process_item(classifier, source, aggregator, item, stats)? {
                section.push(rendered);
            }
        }

        debug!(
            feed = %source.url,
            considered = source.limit.min(feed.items.len()),
            rendered = section.rendered_items.len(),
            "feed processed"
        );
        Ok(section)
    }

    fn process_item(
        &self,
        classifier: &Classifier<'_>,
        source: &FeedSource,
        aggregator: bool,
        item: &FeedItem,
        stats: &mut RunStats,
    ) -> Result<Option<String>, StoreError> {
        let summary = match classifier.classify(&item.link)? {
            Verdict::StaleSkip => {
                stats.skipped += 1;
                return Ok(None);
            }
            Verdict::FreshRepeat(record) => {
                stats.repeat += 1;
                record.summary.unwrap_or_default()
            }
            Verdict::FreshNew => self.record_new(source, item, stats)?,
        };

        let comments = if aggregator {
            self.comments_for(item)
        } else {
            None
        };

        let rendered = self.renderer.render(ItemView {
            item,
            summary: source.summarize.then_some(summary.as_str()),
            comments: comments.as_ref(),
        });
        Ok(Some(rendered))
    }

    /// Insert a first-seen item, returning the summary to render.
    ///
    /// Losing an insert race to a concurrent run is the same as having seen
    /// the item earlier today.
    fn record_new(
        &self,
        source: &FeedSource,
        item: &FeedItem,
        stats: &mut RunStats,
    ) -> Result<String, StoreError> {
        let summary = if source.summarize {
            summarize_or_empty(self.summarizer, &item.link)
        } else {
            String::new()
        };

        match self.store.insert(&item.link, self.ctx.date, &summary) {
            Ok(()) => {
                stats.new += 1;
                Ok(summary)
            }
            Err(StoreError::Duplicate(url)) => {
                info!(link = %url, "item recorded concurrently, treating as already seen today");
                stats.repeat += 1;
                let cached = self.store.lookup(&item.link)?.and_then(|r| r.summary);
                Ok(cached.unwrap_or(summary))
            }
            Err(e) => Err(e),
        }
    }

    fn comments_for(&self, item: &FeedItem) -> Option<CommentInfo> {
        match self.extractor.extract(&item.description) {
            Extraction::Found(info) => Some(info),
            Extraction::Missing => {
                debug!(link = %item.link, "no comment fields in aggregator item");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
