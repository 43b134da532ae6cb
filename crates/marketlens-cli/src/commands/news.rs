use std::str::FromStr;

use marketlens_core::{
    DataFeed, DateKey, NewsFilterEngine, NewsQueryRouter, Selection, Symbol, TimeWindow,
};
use serde_json::json;

use crate::cli::NewsArgs;
use crate::error::CliError;

use super::{feed_error_to_envelope, CommandResult};

pub async fn run(args: &NewsArgs, feed: &dyn DataFeed) -> Result<CommandResult, CliError> {
    if let Some(id) = args.id {
        return fetch_single(id, feed).await;
    }

    let symbol = Symbol::parse(&args.symbol)?;
    let window = TimeWindow::from_str(&args.window)?;
    let selection = selection_from_args(args)?;

    let routed =
        NewsQueryRouter::route_for_feed(&symbol, window, &selection, &feed.capabilities())?;

    let mut result = match feed.news(routed.query.clone()).await {
        Ok(articles) => {
            let articles = match &routed.client_filter {
                Some(filter) => NewsFilterEngine::filter(&articles, filter),
                None => articles,
            };

            let labels: Vec<&str> = articles
                .iter()
                .map(|article| article.sentiment_label().as_str())
                .collect();

            CommandResult::ok(json!({
                "symbol": symbol,
                "shape": routed.query.shape(),
                "count": articles.len(),
                "labels": labels,
                "articles": articles,
            }))
        }
        Err(error) => CommandResult::ok(serde_json::Value::Null)
            .with_error(feed_error_to_envelope(&error)),
    };

    if routed.client_filter.is_some() {
        result = result
            .with_warning("feed cannot serve the date shape natively; filtered client-side");
    }

    Ok(result)
}

async fn fetch_single(id: u64, feed: &dyn DataFeed) -> Result<CommandResult, CliError> {
    match feed.news_item(id).await {
        Ok(article) => Ok(CommandResult::ok(json!({ "article": article }))),
        Err(error) => Ok(CommandResult::ok(serde_json::Value::Null)
            .with_error(feed_error_to_envelope(&error))),
    }
}

fn selection_from_args(args: &NewsArgs) -> Result<Selection, CliError> {
    if let Some(date) = &args.date {
        return Ok(Selection::point(DateKey::normalize(date)?));
    }

    if let (Some(from), Some(to)) = (&args.from, &args.to) {
        return Ok(Selection::range(
            DateKey::normalize(from)?,
            DateKey::normalize(to)?,
        ));
    }

    Ok(Selection::None)
}
