use marketlens_core::{DataFeed, FeedId};
use serde_json::json;

use crate::error::CliError;

use super::CommandResult;

pub fn run(feed: &dyn DataFeed) -> Result<CommandResult, CliError> {
    let capabilities = feed.capabilities();

    Ok(CommandResult::ok(json!({
        "active": {
            "id": feed.id(),
            "single_date": capabilities.single_date,
            "date_range": capabilities.date_range,
        },
        "available": FeedId::ALL
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>(),
    })))
}
