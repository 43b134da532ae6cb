use std::str::FromStr;

use marketlens_core::{DataFeed, Symbol, TimeWindow, TimelineRequest};
use serde_json::json;

use crate::cli::TimelineArgs;
use crate::error::CliError;

use super::{feed_error_to_envelope, CommandResult};

pub async fn run(args: &TimelineArgs, feed: &dyn DataFeed) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let window = TimeWindow::from_str(&args.window)?;

    let request = TimelineRequest {
        symbol: symbol.clone(),
        window,
    };

    match feed.timeline(request).await {
        Ok(points) => Ok(CommandResult::ok(json!({
            "symbol": symbol,
            "window": window,
            "points": points,
        }))),
        Err(error) => Ok(CommandResult::ok(serde_json::Value::Null)
            .with_error(feed_error_to_envelope(&error))),
    }
}
