//! CLI argument definitions for marketlens.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `timeline` | Fetch the aggregated per-day timeline series |
//! | `market` | Fetch OHLCV bars for the market chart |
//! | `news` | Fetch news for a date, a range, or the default window |
//! | `feeds` | Show the active feed and its query capabilities |
//! | `replay` | Drive a selection session from an event script |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, ndjson, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings as errors |
//! | `--feed` | `fixture` | Data feed backing the queries |
//! | `--base-url` | `http://localhost:8000` | Base URL for the http feed |

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Interactive market timeline and news explorer.
///
/// Select a date or date range on the timeline and the news feed narrows
/// to exactly that window; this binary exposes the same query pipeline
/// from the command line.
#[derive(Debug, Parser)]
#[command(
    name = "marketlens",
    author,
    version,
    about = "Market timeline and news exploration CLI"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Data feed backing the queries.
    #[arg(long, global = true, value_enum, default_value_t = FeedSelector::Fixture)]
    pub feed: FeedSelector,

    /// Base URL for the http feed.
    #[arg(long, global = true, default_value = "http://localhost:8000")]
    pub base_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Ndjson,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FeedSelector {
    Fixture,
    Http,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the aggregated per-day timeline series.
    Timeline(TimelineArgs),
    /// Fetch OHLCV bars for the market chart.
    Market(MarketArgs),
    /// Fetch news for a date, a range, or the default window.
    News(NewsArgs),
    /// Show the active feed and its query capabilities.
    Feeds,
    /// Drive a selection session from an NDJSON event script.
    Replay(ReplayArgs),
}

#[derive(Debug, Args)]
pub struct TimelineArgs {
    /// Ticker symbol.
    #[arg(default_value = "GENERAL")]
    pub symbol: String,

    /// Chart window (1w, 1m, 3m, 1y).
    #[arg(long, default_value = "1m")]
    pub window: String,
}

#[derive(Debug, Args)]
pub struct MarketArgs {
    /// Ticker symbol.
    #[arg(default_value = "GENERAL")]
    pub symbol: String,

    /// Chart window (1w, 1m, 3m, 1y).
    #[arg(long, default_value = "1m")]
    pub window: String,
}

#[derive(Debug, Args)]
pub struct NewsArgs {
    /// Ticker symbol.
    #[arg(default_value = "GENERAL")]
    pub symbol: String,

    /// Default query window when no date is selected (1w, 1m, 3m, 1y).
    #[arg(long, default_value = "1m")]
    pub window: String,

    /// Single selected date (`YYYY-MM-DD` or ISO-8601 datetime).
    #[arg(long, conflicts_with_all = ["from", "to", "id"])]
    pub date: Option<String>,

    /// Range start, inclusive; requires --to.
    #[arg(long, requires = "to", conflicts_with = "id")]
    pub from: Option<String>,

    /// Range end, inclusive; requires --from.
    #[arg(long, requires = "from", conflicts_with = "id")]
    pub to: Option<String>,

    /// Fetch a single article by id instead of querying by date.
    #[arg(long)]
    pub id: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Event script path; `-` reads NDJSON events from stdin.
    #[arg(default_value = "-")]
    pub events: String,

    /// Ticker symbol.
    #[arg(long, default_value = "GENERAL")]
    pub symbol: String,

    /// Chart window (1w, 1m, 3m, 1y).
    #[arg(long, default_value = "1m")]
    pub window: String,

    /// Initial selection mode (point or range).
    #[arg(long, default_value = "range")]
    pub mode: String,

    /// Chart width in pixels for pixel-addressed events.
    #[arg(long, default_value_t = 600.0)]
    pub width: f64,
}
