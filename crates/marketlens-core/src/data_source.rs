use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::query::NewsQuery;
use crate::{MarketBar, NewsArticle, Symbol, TimeSeriesPoint, TimeWindow, ValidationError};

/// Canonical feed identifiers used in metadata and envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedId {
    Fixture,
    Http,
}

impl FeedId {
    pub const ALL: [Self; 2] = [Self::Fixture, Self::Http];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fixture => "fixture",
            Self::Http => "http",
        }
    }
}

impl Display for FeedId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fixture" => Ok(Self::Fixture),
            "http" => Ok(Self::Http),
            other => Err(ValidationError::InvalidFeed {
                value: other.to_owned(),
            }),
        }
    }
}

/// Date shapes a feed can serve natively.
///
/// The default window is always served; when a date shape is missing the
/// session downgrades the query and narrows the window client-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedCapabilities {
    pub single_date: bool,
    pub date_range: bool,
}

impl FeedCapabilities {
    pub const fn new(single_date: bool, date_range: bool) -> Self {
        Self {
            single_date,
            date_range,
        }
    }

    pub const fn full() -> Self {
        Self::new(true, true)
    }

    pub const fn window_only() -> Self {
        Self::new(false, false)
    }

    pub fn supports(&self, query: &NewsQuery) -> bool {
        match query {
            NewsQuery::DefaultWindow { .. } => true,
            NewsQuery::SingleDate { .. } => self.single_date,
            NewsQuery::DateRange { .. } => self.date_range,
        }
    }
}

/// Feed error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedErrorKind {
    Transport,
    NotFound,
    InvalidRequest,
    UnsupportedQueryShape,
    Internal,
}

/// Structured feed error surfaced as the user-visible failed-to-load state.
///
/// The core never retries; retries, if any, belong to the feed itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedError {
    kind: FeedErrorKind,
    message: String,
    retryable: bool,
}

impl FeedError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: FeedErrorKind::Transport,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: FeedErrorKind::NotFound,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: FeedErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn unsupported_query_shape(shape: &str) -> Self {
        Self {
            kind: FeedErrorKind::UnsupportedQueryShape,
            message: format!("query shape '{shape}' is not supported by this feed"),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: FeedErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> FeedErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            FeedErrorKind::Transport => "feed.transport",
            FeedErrorKind::NotFound => "feed.not_found",
            FeedErrorKind::InvalidRequest => "feed.invalid_request",
            FeedErrorKind::UnsupportedQueryShape => "feed.unsupported_query_shape",
            FeedErrorKind::Internal => "feed.internal",
        }
    }
}

impl Display for FeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for FeedError {}

/// Request payload for the aggregated timeline endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineRequest {
    pub symbol: Symbol,
    pub window: TimeWindow,
}

/// Request payload for the OHLCV market endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketRequest {
    pub symbol: Symbol,
    pub window: TimeWindow,
}

type FeedFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, FeedError>> + Send + 'a>>;

/// Fetch collaborator contract.
///
/// Given a query, a feed returns a sequence of records or fails; the core
/// surfaces a failure as an explicit error state and issues no retries of
/// its own. Implementations must be `Send + Sync` for sharing across the
/// session and its dependents.
pub trait DataFeed: Send + Sync {
    fn id(&self) -> FeedId;

    fn capabilities(&self) -> FeedCapabilities;

    /// Aggregated per-day timeline for the window, sorted ascending by date.
    fn timeline<'a>(&'a self, req: TimelineRequest) -> FeedFuture<'a, Vec<TimeSeriesPoint>>;

    /// OHLCV bars for the window, sorted ascending by date.
    fn market<'a>(&'a self, req: MarketRequest) -> FeedFuture<'a, Vec<MarketBar>>;

    /// Articles matching the query shape.
    fn news<'a>(&'a self, query: NewsQuery) -> FeedFuture<'a, Vec<NewsArticle>>;

    /// Single article lookup for the detail panel.
    fn news_item<'a>(&'a self, id: u64) -> FeedFuture<'a, NewsArticle>;
}
