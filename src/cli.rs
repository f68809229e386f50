use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

/// Write today's unseen feed items to the terminal or a daily markdown file.
#[derive(Debug, Parser)]
#[command(name = "feed-digest", version, about)]
pub struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, default_value = "feed-digest.json")]
    pub config: PathBuf,

    /// Print to the terminal even if the config selects markdown.
    #[arg(short, long)]
    pub terminal: bool,

    /// Seen-items database (overrides the config).
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Run as if today were this date (YYYY-MM-DD).
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Debug-level logging unless RUST_LOG is set.
    #[arg(short, long)]
    pub verbose: bool,
}
