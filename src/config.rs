//! Run-time configuration, loaded once at startup.
//!
//! ```json
//! {
//!   "terminal_mode": false,
//!   "markdown_dir": "/home/me/notes/daily",
//!   "markdown_prefix": "",
//!   "markdown_suffix": "_feeds",
//!   "instapaper": true,
//!   "latitude": 52.52,
//!   "longitude": 13.41,
//!   "llm": { "base_url": "https://api.openai.com/v1", "model": "gpt-4o-mini" },
//!   "feeds": [
//!     { "url": "https://hnrss.org/frontpage", "limit": 10 },
//!     { "url": "https://blog.rust-lang.org/feed.xml", "limit": 3, "summarize": true }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::render::OutputMode;
use crate::summarize::LlmConfig;

/// Environment variable consulted when `llm.api_key` is empty.
pub const API_KEY_ENV: &str = "FEED_DIGEST_LLM_API_KEY";

/// One configured feed endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FeedSource {
    pub url: String,
    /// Items considered per run, in fetch order. Zero means none.
    #[serde(default)]
    pub limit: usize,
    #[serde(default)]
    pub summarize: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub feeds: Vec<FeedSource>,
    #[serde(default)]
    pub terminal_mode: bool,
    #[serde(default = "default_markdown_dir")]
    pub markdown_dir: PathBuf,
    #[serde(default)]
    pub markdown_prefix: String,
    #[serde(default)]
    pub markdown_suffix: String,
    #[serde(default = "default_database")]
    pub database: PathBuf,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub instapaper: bool,
    pub llm: Option<LlmConfig>,
}

fn default_markdown_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_database() -> PathBuf {
    PathBuf::from("feed-digest.db")
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let mut config = Self::from_json(&raw)
            .with_context(|| format!("parse config {}", path.display()))?;
        if let Some(llm) = config.llm.as_mut() {
            if llm.api_key.trim().is_empty() {
                llm.api_key = std::env::var(API_KEY_ENV).unwrap_or_default();
            }
        }
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn output_mode(&self) -> OutputMode {
        if self.terminal_mode {
            OutputMode::Terminal
        } else {
            OutputMode::Markdown
        }
    }

    pub fn wants_summaries(&self) -> bool {
        self.feeds.iter().any(|f| f.summarize)
    }
}

/// The per-run values every component is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunContext {
    pub date: NaiveDate,
    pub mode: OutputMode,
}

impl RunContext {
    pub fn new(date: NaiveDate, mode: OutputMode) -> Self {
        Self { date, mode }
    }

    pub fn today(mode: OutputMode) -> Self {
        Self::new(chrono::Local::now().date_naive(), mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::from_json(r#"{"feeds":[{"url":"https://example.com/rss"}]}"#).unwrap();
        assert_eq!(
            config.feeds,
            vec![FeedSource { url: "https://example.com/rss".into(), limit: 0, summarize: false }]
        );
        assert_eq!(config.output_mode(), OutputMode::Markdown);
        assert_eq!(config.database, PathBuf::from("feed-digest.db"));
        assert_eq!(config.markdown_dir, PathBuf::from("."));
        assert!(config.llm.is_none());
        assert!(!config.wants_summaries());
    }

    #[test]
    fn full_config() {
        let config = Config::from_json(
            r#"{
                "terminal_mode": true,
                "markdown_prefix": "d-",
                "markdown_suffix": "-x",
                "instapaper": true,
                "latitude": 1.5,
                "longitude": -2.0,
                "llm": {"base_url": "http://localhost:8080/v1", "model": "m"},
                "feeds": [
                    {"url": "a", "limit": 5, "summarize": true},
                    {"url": "b", "limit": 2}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.output_mode(), OutputMode::Terminal);
        assert_eq!(config.feeds.len(), 2);
        assert_eq!(config.feeds[0].limit, 5);
        assert!(config.wants_summaries());
        let llm = config.llm.unwrap();
        assert_eq!(llm.timeout_secs, 30);
        assert_eq!(llm.api_key, "");
    }

    #[test]
    fn feed_order_is_preserved() {
        let config = Config::from_json(
            r#"{"feeds":[{"url":"z"},{"url":"a"},{"url":"m"}]}"#,
        )
        .unwrap();
        let urls: Vec<_> = config.feeds.iter().map(|f| f.url.as_str()).collect();
        assert_eq!(urls, ["z", "a", "m"]);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Config::from_json("{feeds:").is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("read config"));
    }
}
