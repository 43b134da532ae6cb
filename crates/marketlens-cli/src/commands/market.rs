use std::str::FromStr;

use marketlens_core::{DataFeed, MarketRequest, Symbol, TimeWindow};
use serde_json::json;

use crate::cli::MarketArgs;
use crate::error::CliError;

use super::{feed_error_to_envelope, CommandResult};

pub async fn run(args: &MarketArgs, feed: &dyn DataFeed) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let window = TimeWindow::from_str(&args.window)?;

    let request = MarketRequest {
        symbol: symbol.clone(),
        window,
    };

    match feed.market(request).await {
        Ok(bars) => Ok(CommandResult::ok(json!({
            "symbol": symbol,
            "window": window,
            "bars": bars,
        }))),
        Err(error) => Ok(CommandResult::ok(serde_json::Value::Null)
            .with_error(feed_error_to_envelope(&error))),
    }
}
