//! Core contracts for marketlens.
//!
//! This crate contains:
//! - Canonical domain models and validation (date keys, symbols, series)
//! - The timeline selection state machine and broadcast contract
//! - News query routing, stale-response suppression, and local filtering
//! - Data feed traits/adapters and the response envelope

pub mod adapters;
pub mod broadcast;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod interaction;
pub mod panel;
pub mod query;
pub mod selection;
pub mod session;

pub use adapters::{FixtureFeed, HttpFeed};
pub use broadcast::{SelectionBroadcaster, SubscriberId};
pub use data_source::{
    DataFeed, FeedCapabilities, FeedError, FeedErrorKind, FeedId, MarketRequest, TimelineRequest,
};
pub use domain::{
    DateKey, MarketBar, NewsArticle, SentimentLabel, Symbol, TimeSeriesPoint, TimeWindow,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};
pub use error::ValidationError;
pub use filter::NewsFilterEngine;
pub use interaction::{Effect, SelectionStateMachine};
pub use panel::{CategoryAxis, ChartSurface, NewsPanelState, PointerCapture, SelectionOverlay};
pub use query::{
    NewsQuery, NewsQueryRouter, QuerySequencer, RequestTicket, RouteError, RoutedQuery,
};
pub use selection::{order, DateSpan, Selection, SelectionMode};
pub use session::{ExplorerSession, PreparedNewsQuery};
