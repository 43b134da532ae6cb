use std::fs::File;
use std::io::{BufRead, BufReader};
use std::str::FromStr;
use std::sync::Arc;

use marketlens_core::{
    CategoryAxis, ChartSurface, DataFeed, DateKey, Effect, ExplorerSession, NewsPanelState,
    Selection, SelectionMode, Symbol, TimeWindow,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::cli::ReplayArgs;
use crate::error::CliError;

use super::CommandResult;

/// One interaction event from the script.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum ReplayEvent {
    Click { date: String },
    ClickAt { x: f64 },
    Hover { date: String },
    HoverAt { x: f64 },
    Mode { mode: String },
    Window { window: String },
    Clear,
}

pub async fn run(args: &ReplayArgs, feed: Arc<dyn DataFeed>) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let window = TimeWindow::from_str(&args.window)?;
    let mode = SelectionMode::from_str(&args.mode)?;

    let mut session = ExplorerSession::new(Arc::clone(&feed), symbol, window, mode);

    // Pixel-addressed events resolve against the loaded series categories.
    let mut warnings = Vec::new();
    match session.load_timeline().await {
        Ok(points) => {
            let dates: Vec<DateKey> = points.into_iter().map(|point| point.date).collect();
            let axis = Arc::new(CategoryAxis::new(dates, args.width));
            session.bind_surface(axis as Arc<dyn ChartSurface>);
        }
        Err(error) => {
            warnings.push(format!("timeline unavailable, pixel events disabled: {error}"));
        }
    }

    let reader: Box<dyn BufRead> = if args.events == "-" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        Box::new(BufReader::new(File::open(&args.events)?))
    };

    let mut log = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let event: ReplayEvent = match serde_json::from_str(&line) {
            Ok(event) => event,
            Err(error) => {
                log.push(json!({ "line": number + 1, "rejected": error.to_string() }));
                continue;
            }
        };

        let entry = step(&mut session, &feed, event).await?;
        log.push(entry);
    }

    let mut result = CommandResult::ok(json!({
        "events": log,
        "final": {
            "selection": session.selection(),
            "broadcast_commits": session.broadcast_commits(),
            "panel": session.news().label(),
        },
    }));
    for warning in warnings {
        result = result.with_warning(warning);
    }
    Ok(result)
}

async fn step(
    session: &mut ExplorerSession,
    feed: &Arc<dyn DataFeed>,
    event: ReplayEvent,
) -> Result<Value, CliError> {
    let (name, effect) = match event {
        ReplayEvent::Click { date } => match DateKey::normalize(&date) {
            // A malformed date rejects the event and leaves state unchanged.
            Err(error) => return Ok(json!({ "event": "click", "rejected": error.to_string() })),
            Ok(date) => ("click", Some(session.click(date))),
        },
        ReplayEvent::Hover { date } => match DateKey::normalize(&date) {
            Err(error) => return Ok(json!({ "event": "hover", "rejected": error.to_string() })),
            Ok(date) => ("hover", Some(session.hover(date))),
        },
        ReplayEvent::ClickAt { x } => ("click_at", session.click_at(x)),
        ReplayEvent::HoverAt { x } => ("hover_at", session.hover_at(x)),
        ReplayEvent::Mode { mode } => match SelectionMode::from_str(&mode) {
            Err(error) => return Ok(json!({ "event": "mode", "rejected": error.to_string() })),
            Ok(mode) => ("mode", Some(session.set_mode(mode))),
        },
        ReplayEvent::Window { window } => match TimeWindow::from_str(&window) {
            Err(error) => return Ok(json!({ "event": "window", "rejected": error.to_string() })),
            Ok(window) => ("window", Some(session.set_window(window))),
        },
        ReplayEvent::Clear => ("clear", Some(session.clear())),
    };

    let mut entry = json!({ "event": name, "effect": describe_effect(&effect) });

    // Each commit re-queries the dependent news panel, exactly once.
    if matches!(effect, Some(Effect::Commit(_))) {
        let prepared = session.prepare_news_query()?;
        let result = feed.news(prepared.routed.query.clone()).await;
        session.apply_news_response(&prepared, result);

        entry["query"] = json!({
            "shape": prepared.routed.query.shape(),
            "client_filtered": prepared.routed.client_filter.is_some(),
        });
        entry["panel"] = panel_summary(session.news());
    }

    Ok(entry)
}

fn describe_effect(effect: &Option<Effect>) -> Value {
    match effect {
        None => json!("out_of_plot"),
        Some(Effect::NoChange) => json!("no_change"),
        Some(Effect::Span(span)) => json!({ "span": span }),
        Some(Effect::Commit(selection)) => json!({ "commit": commit_summary(selection) }),
    }
}

fn commit_summary(selection: &Selection) -> Value {
    serde_json::to_value(selection).unwrap_or(Value::Null)
}

fn panel_summary(state: &NewsPanelState) -> Value {
    match state {
        NewsPanelState::Ready(articles) => json!({
            "state": state.label(),
            "count": articles.len(),
        }),
        other => json!({ "state": other.label() }),
    }
}
