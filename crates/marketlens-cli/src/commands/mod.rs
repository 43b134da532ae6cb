mod feeds;
mod market;
mod news;
mod replay;
mod timeline;

use std::sync::Arc;
use std::time::Instant;

use marketlens_core::{DataFeed, Envelope, EnvelopeMeta, FixtureFeed, HttpFeed};
use serde_json::Value;
use uuid::Uuid;

use crate::cli::{Cli, Command, FeedSelector};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<marketlens_core::EnvelopeError>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_error(mut self, error: marketlens_core::EnvelopeError) -> Self {
        self.errors.push(error);
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let feed = build_feed(cli);
    let started = Instant::now();

    let command_result = match &cli.command {
        Command::Timeline(args) => timeline::run(args, feed.as_ref()).await?,
        Command::Market(args) => market::run(args, feed.as_ref()).await?,
        Command::News(args) => news::run(args, feed.as_ref()).await?,
        Command::Feeds => feeds::run(feed.as_ref())?,
        Command::Replay(args) => replay::run(args, Arc::clone(&feed)).await?,
    };

    let CommandResult {
        data,
        warnings,
        errors,
    } = command_result;

    let mut meta = EnvelopeMeta::new(
        Uuid::new_v4().to_string(),
        "v1.0.0",
        feed.id(),
        elapsed_ms(started),
    )?;

    for warning in warnings {
        meta.push_warning(warning);
    }

    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}

fn build_feed(cli: &Cli) -> Arc<dyn DataFeed> {
    match cli.feed {
        FeedSelector::Fixture => Arc::new(FixtureFeed::default()),
        FeedSelector::Http => Arc::new(HttpFeed::new(cli.base_url.clone())),
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64
}

fn feed_error_to_envelope(error: &marketlens_core::FeedError) -> marketlens_core::EnvelopeError {
    marketlens_core::EnvelopeError::new(error.code(), error.message())
        .expect("code/message are non-empty")
        .with_retryable(error.retryable())
}
