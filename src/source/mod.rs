//! Feed fetching.
//!
//! This module defines the [`FeedFetcher`] trait and the common [`Feed`] and
//! [`FeedItem`] types.  Concrete fetchers live in sub-modules (currently only
//! [`rss`]).
//!
//! ## Adding a new feed format
//!
//! 1. Create a new file in this directory (e.g. `atom.rs`).
//! 2. Define a struct and implement [`FeedFetcher`] for it, converting the
//!    native entries into [`FeedItem`]s in fetch order.
//! 3. Add `mod atom;` below and re-export your struct.
//! 4. Construct it in `main.rs` instead of (or alongside) [`RssFetcher`].
//!
//! The pipeline only ever sees `Feed` values, so classification, rendering and
//! the digest writer need no changes.

mod feed_item;
mod rss;

pub use feed_item::{Feed, FeedItem};
pub use rss::RssFetcher;

/// Why a feed could not be fetched.
///
/// Every variant is treated the same way by the pipeline: the source is
/// skipped for this run.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    HttpStatus(u16),
    #[error("could not parse feed: {0}")]
    Parse(#[from] ::rss::Error),
}

/// Trait that every feed fetcher must implement.
///
/// Calls are synchronous and blocking; feeds are fetched one at a time.
pub trait FeedFetcher {
    /// Fetch and parse the feed at `url`.
    fn fetch(&self, url: &str) -> Result<Feed, FetchError>;
}
