use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::data_source::FeedCapabilities;
use crate::selection::Selection;
use crate::{DateKey, Symbol, TimeWindow};

/// Backend query shape chosen from the current selection.
///
/// Inclusive on both ends for `DateRange`; a degenerate range and a true
/// point selection are indistinguishable here, both arriving as
/// `SingleDate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum NewsQuery {
    SingleDate {
        symbol: Symbol,
        date: DateKey,
    },
    DateRange {
        symbol: Symbol,
        start: DateKey,
        end: DateKey,
    },
    DefaultWindow {
        symbol: Symbol,
        days: u32,
    },
}

impl NewsQuery {
    pub fn symbol(&self) -> &Symbol {
        match self {
            Self::SingleDate { symbol, .. }
            | Self::DateRange { symbol, .. }
            | Self::DefaultWindow { symbol, .. } => symbol,
        }
    }

    pub const fn shape(&self) -> &'static str {
        match self {
            Self::SingleDate { .. } => "single_date",
            Self::DateRange { .. } => "date_range",
            Self::DefaultWindow { .. } => "default_window",
        }
    }
}

/// Routing defects. The router trusts its inputs are already normalized;
/// a malformed selection reaching it is a programming error, not a runtime
/// condition, and is surfaced instead of recovered.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("selection precondition violated: {reason}")]
    PreconditionViolation { reason: &'static str },
}

/// Routed query plus any client-side narrowing still required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedQuery {
    pub query: NewsQuery,
    /// Present when the feed cannot serve the date shape natively and the
    /// fetched window must be narrowed locally by the filter engine.
    pub client_filter: Option<Selection>,
}

/// Chooses which backend query shape to issue for a selection.
pub struct NewsQueryRouter;

impl NewsQueryRouter {
    /// Map a committed selection onto a query shape.
    pub fn route(
        symbol: &Symbol,
        window: TimeWindow,
        selection: &Selection,
    ) -> Result<NewsQuery, RouteError> {
        let span = match selection {
            Selection::None => {
                return Ok(NewsQuery::DefaultWindow {
                    symbol: symbol.clone(),
                    days: window.days(),
                })
            }
            Selection::Range {
                in_progress: true, ..
            } => {
                return Err(RouteError::PreconditionViolation {
                    reason: "in-progress range reached the query boundary",
                })
            }
            committed => committed
                .canonical_range()
                .ok_or(RouteError::PreconditionViolation {
                    reason: "selection has no canonical range",
                })?,
        };

        if span.end < span.start {
            return Err(RouteError::PreconditionViolation {
                reason: "range endpoints out of order",
            });
        }

        let query = if span.is_degenerate() {
            NewsQuery::SingleDate {
                symbol: symbol.clone(),
                date: span.start,
            }
        } else {
            NewsQuery::DateRange {
                symbol: symbol.clone(),
                start: span.start,
                end: span.end,
            }
        };

        debug!(shape = query.shape(), "routed news query");
        Ok(query)
    }

    /// Route against a concrete feed, downgrading to the default window
    /// plus a client-side filter when the feed cannot serve the date shape.
    pub fn route_for_feed(
        symbol: &Symbol,
        window: TimeWindow,
        selection: &Selection,
        capabilities: &FeedCapabilities,
    ) -> Result<RoutedQuery, RouteError> {
        let query = Self::route(symbol, window, selection)?;

        if capabilities.supports(&query) {
            return Ok(RoutedQuery {
                query,
                client_filter: None,
            });
        }

        debug!(
            shape = query.shape(),
            "feed cannot serve the date shape, falling back to client-side filtering"
        );
        Ok(RoutedQuery {
            query: NewsQuery::DefaultWindow {
                symbol: symbol.clone(),
                days: window.days(),
            },
            client_filter: Some(selection.clone()),
        })
    }
}

/// Causal token for one issued query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

/// Monotonic sequence used for stale-response suppression.
///
/// Only the result of the most recently issued query may be applied to the
/// view; arrival order is irrelevant, so a slow early response can never
/// overwrite a fast later one.
#[derive(Debug, Default)]
pub struct QuerySequencer {
    next: u64,
    current: Option<u64>,
}

impl QuerySequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> RequestTicket {
        self.next += 1;
        self.current = Some(self.next);
        RequestTicket(self.next)
    }

    /// Whether a completing request is still the most recently issued.
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.current == Some(ticket.0)
    }
}
