//! feed-digest: a once-per-invocation digest of new feed items.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌───────────┐  Feed   ┌─────────────┐ Verdict ┌──────────────┐
//! │ source/   │ ──────► │ pipeline.rs │ ◄────── │ classify.rs  │
//! │ (fetch)   │         │ (per item)  │         │ + store.rs   │
//! └───────────┘         └─────────────┘         └──────────────┘
//!                         │         │
//!          summarize.rs ◄─┘         └─► render.rs / comments.rs
//!                                             │
//!                                        digest.rs ──► stdout | {prefix}{date}{suffix}.md
//! ```
//!
//! * **`source/`**: the `FeedFetcher` trait, `Feed`/`FeedItem`, and the RSS
//!   fetcher.
//! * **`store`**: the insert-only SQLite table of seen URLs.
//! * **`classify`**: new today, repeat from earlier today, or stale.
//! * **`comments`**: comment-count badges for aggregator feeds.
//! * **`render`**: terminal hyperlinks or markdown links.
//! * **`digest`**: per-feed sections and the output file.
//! * **`summarize`** / **`weather`**: optional network collaborators.
//! * **`pipeline`**: runs every feed through the above.
//! * **`main`**: parse args, load config, set up logging, and run once.

mod classify;
mod cli;
mod comments;
mod config;
mod digest;
mod pipeline;
mod render;
mod source;
mod store;
mod summarize;
mod weather;

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use comments::LabelExtractor;
use config::{Config, RunContext};
use digest::DigestWriter;
use pipeline::Pipeline;
use render::OutputMode;
use source::RssFetcher;
use store::SeenStore;
use summarize::{LlmSummarizer, NoSummarizer, Summarizer};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn build_summarizer(config: &Config) -> Result<Box<dyn Summarizer>> {
    match config.llm.clone() {
        Some(llm) => Ok(Box::new(
            LlmSummarizer::new(llm).context("build summarizer HTTP client")?,
        )),
        None => {
            if config.wants_summaries() {
                warn!("feeds request summaries but no llm section is configured");
            }
            Ok(Box::new(NoSummarizer))
        }
    }
}

/// stdout, or the day's markdown file opened once for append.
fn open_output(config: &Config, ctx: &RunContext) -> Result<Box<dyn Write>> {
    match ctx.mode {
        OutputMode::Terminal => Ok(Box::new(io::stdout().lock())),
        OutputMode::Markdown => {
            let path = digest::markdown_path(
                &config.markdown_dir,
                &config.markdown_prefix,
                ctx.date,
                &config.markdown_suffix,
            );
            let file = digest::open_markdown(&path)
                .with_context(|| format!("open {}", path.display()))?;
            info!(path = %path.display(), "appending digest");
            Ok(Box::new(file))
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // -- configuration -------------------------------------------------------
    let mut config = Config::load(&cli.config)?;
    if cli.terminal {
        config.terminal_mode = true;
    }
    if let Some(path) = cli.database {
        config.database = path;
    }
    let ctx = match cli.date {
        Some(date) => RunContext::new(date, config.output_mode()),
        None => RunContext::today(config.output_mode()),
    };

    // -- collaborators -------------------------------------------------------
    let store = SeenStore::open(&config.database)
        .with_context(|| format!("open seen store {}", config.database.display()))?;
    let fetcher = RssFetcher::new().context("build feed HTTP client")?;
    let summarizer = build_summarizer(&config)?;

    let mut writer = DigestWriter::new(open_output(&config, &ctx)?, ctx.mode);

    // -- weather -------------------------------------------------------------
    if weather::has_location(config.latitude, config.longitude) {
        match weather::fetch(config.latitude, config.longitude) {
            Ok(current) => writer
                .write_preamble(&weather::render(&current))
                .context("write weather block")?,
            Err(e) => warn!(error = %e, "weather lookup failed"),
        }
    }

    // -- digest --------------------------------------------------------------
    let pipeline = Pipeline::new(
        ctx,
        &store,
        &fetcher,
        summarizer.as_ref(),
        &LabelExtractor,
        config.instapaper,
    );
    let stats = pipeline.run(&config.feeds, &mut writer)?;
    let seen_total = store.len()?;

    info!(
        date = %ctx.date,
        new = stats.new,
        repeat = stats.repeat,
        skipped = stats.skipped,
        failed_feeds = stats.failed_feeds,
        sections = stats.sections,
        seen_total,
        "digest complete"
    );
    Ok(())
}
