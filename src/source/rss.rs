//! RSS feed fetcher.
//!
//! Fetches an RSS 2.0 document over HTTP with blocking [`reqwest`] and parses
//! it with the [`rss`] crate.

use std::time::Duration;

use super::{Feed, FeedFetcher, FeedItem, FetchError};

/// How long a single feed request may take before it counts as a failure.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct RssFetcher {
    client: reqwest::blocking::Client,
}

impl RssFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Convert an already-parsed [`rss::Channel`] into a [`Feed`].
    ///
    /// This is a pure function (no I/O) so that tests can exercise the
    /// mapping without hitting the network.
    pub fn parse_channel(channel: &rss::Channel) -> Feed {
        let items = channel
            .items()
            .iter()
            .map(|item| {
                FeedItem::new(
                    item.title().unwrap_or_default(),
                    item.link().unwrap_or_default(),
                    item.description().unwrap_or_default(),
                )
            })
            .collect();

        Feed {
            title: channel.title().to_string(),
            self_link: self_link(channel).unwrap_or_default(),
            items,
        }
    }
}

/// The `atom:link rel="self"` href, if the channel carries one.
fn self_link(channel: &rss::Channel) -> Option<String> {
    channel
        .atom_ext()?
        .links()
        .iter()
        .find(|link| link.rel() == "self")
        .map(|link| link.href().to_string())
        .filter(|href| !href.is_empty())
}

impl FeedFetcher for RssFetcher {
    fn fetch(&self, url: &str) -> Result<Feed, FetchError> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }
        let body = response.bytes()?;
        let channel = rss::Channel::read_from(body.as_ref())?;
        Ok(Self::parse_channel(&channel))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
