use std::sync::Arc;

use tracing::debug;

use crate::broadcast::{SelectionBroadcaster, SubscriberId};
use crate::data_source::{DataFeed, FeedError, MarketRequest, TimelineRequest};
use crate::interaction::{Effect, SelectionStateMachine};
use crate::panel::{ChartSurface, NewsPanelState, PointerCapture, SelectionOverlay};
use crate::query::{NewsQueryRouter, QuerySequencer, RequestTicket, RouteError, RoutedQuery};
use crate::selection::{DateSpan, Selection, SelectionMode};
use crate::{DateKey, MarketBar, NewsArticle, NewsFilterEngine, Symbol, TimeSeriesPoint, TimeWindow};

/// A routed query stamped with its causal ticket.
///
/// Hand the `routed.query` to the feed, then pass the whole value back to
/// [`ExplorerSession::apply_news_response`] so stale completions can be
/// discarded.
#[derive(Debug, Clone)]
pub struct PreparedNewsQuery {
    pub ticket: RequestTicket,
    pub routed: RoutedQuery,
}

/// Binds the timeline interaction loop to its dependents.
///
/// Owns the selection state machine, the broadcast slot, the query
/// sequencer, and the active symbol/window configuration. All methods run
/// on the single UI event loop; the only asynchronous work is the feed
/// fetch, which completes back through [`apply_news_response`].
///
/// [`apply_news_response`]: ExplorerSession::apply_news_response
pub struct ExplorerSession {
    machine: SelectionStateMachine,
    broadcaster: SelectionBroadcaster,
    sequencer: QuerySequencer,
    feed: Arc<dyn DataFeed>,
    surface: Option<Arc<dyn ChartSurface>>,
    pointer_capture: Option<PointerCapture>,
    symbol: Symbol,
    window: TimeWindow,
    transient: Option<DateSpan>,
    news: NewsPanelState,
}

impl ExplorerSession {
    pub fn new(
        feed: Arc<dyn DataFeed>,
        symbol: Symbol,
        window: TimeWindow,
        mode: SelectionMode,
    ) -> Self {
        Self {
            machine: SelectionStateMachine::new(mode),
            broadcaster: SelectionBroadcaster::new(),
            sequencer: QuerySequencer::new(),
            feed,
            surface: None,
            pointer_capture: None,
            symbol,
            window,
            transient: None,
            news: NewsPanelState::Loading,
        }
    }

    /// Attach the render collaborator so pointer tracking can be scoped to
    /// the in-progress range window.
    pub fn bind_surface(&mut self, surface: Arc<dyn ChartSurface>) {
        self.surface = Some(surface);
    }

    pub fn selection(&self) -> &Selection {
        self.machine.selection()
    }

    pub fn mode(&self) -> SelectionMode {
        self.machine.mode()
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn news(&self) -> &NewsPanelState {
        &self.news
    }

    pub fn transient_span(&self) -> Option<&DateSpan> {
        self.transient.as_ref()
    }

    pub fn subscribe(
        &mut self,
        subscriber: impl FnMut(&Selection) + Send + 'static,
    ) -> SubscriberId {
        self.broadcaster.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.broadcaster.unsubscribe(id)
    }

    pub fn broadcast_commits(&self) -> u64 {
        self.broadcaster.commit_count()
    }

    pub fn last_broadcast(&self) -> Option<&Selection> {
        self.broadcaster.latest()
    }

    /// Overlay descriptors for the committed selection plus any transient
    /// in-progress span.
    pub fn overlays(&self) -> Vec<SelectionOverlay> {
        let mut overlays = Vec::with_capacity(2);
        if let Some(overlay) = SelectionOverlay::for_selection(self.machine.selection()) {
            overlays.push(overlay);
        }
        if let Some(span) = &self.transient {
            overlays.push(SelectionOverlay::for_span(span));
        }
        overlays
    }

    pub fn click(&mut self, date: DateKey) -> Effect {
        let effect = self.machine.click(date);
        self.apply(effect)
    }

    /// Click translated through the bound chart surface; `None` when the
    /// pixel falls outside the plot area or no surface is bound.
    pub fn click_at(&mut self, x: f64) -> Option<Effect> {
        let date = self.surface.as_ref()?.date_at(x)?;
        Some(self.click(date))
    }

    pub fn hover(&mut self, date: DateKey) -> Effect {
        let effect = self.machine.hover(date);
        self.apply(effect)
    }

    pub fn hover_at(&mut self, x: f64) -> Option<Effect> {
        let date = self.surface.as_ref()?.date_at(x)?;
        Some(self.hover(date))
    }

    pub fn set_mode(&mut self, mode: SelectionMode) -> Effect {
        let effect = self.machine.set_mode(mode);
        self.apply(effect)
    }

    pub fn clear(&mut self) -> Effect {
        let effect = self.machine.clear();
        self.apply(effect)
    }

    /// Change the chart window. A selected date may fall outside the new
    /// window, so the selection resets alongside.
    pub fn set_window(&mut self, window: TimeWindow) -> Effect {
        self.window = window;
        let effect = self.machine.clear();
        self.apply(effect)
    }

    /// Change the active symbol; the selection belongs to the previous
    /// series and resets alongside.
    pub fn set_symbol(&mut self, symbol: Symbol) -> Effect {
        self.symbol = symbol;
        let effect = self.machine.clear();
        self.apply(effect)
    }

    fn apply(&mut self, effect: Effect) -> Effect {
        match &effect {
            Effect::Commit(selection) => {
                self.transient = None;
                self.broadcaster.publish(selection.clone());
            }
            Effect::Span(span) => {
                self.transient = Some(span.clone());
            }
            Effect::NoChange => {}
        }
        self.sync_pointer_capture();
        effect
    }

    fn sync_pointer_capture(&mut self) {
        let awaiting = self.machine.awaiting_second_endpoint().is_some();
        match (awaiting, self.pointer_capture.is_some()) {
            (true, false) => {
                if let Some(surface) = &self.surface {
                    self.pointer_capture = Some(PointerCapture::acquire(Arc::clone(surface)));
                }
            }
            (false, true) => {
                self.pointer_capture = None;
            }
            _ => {}
        }
    }

    /// Route the live selection into a query, stamp it with a fresh ticket,
    /// and flip the panel to loading. Every call supersedes the previous
    /// ticket, so earlier in-flight queries become stale.
    pub fn prepare_news_query(&mut self) -> Result<PreparedNewsQuery, RouteError> {
        let routed = NewsQueryRouter::route_for_feed(
            &self.symbol,
            self.window,
            self.machine.selection(),
            &self.feed.capabilities(),
        )?;

        self.news = NewsPanelState::Loading;
        Ok(PreparedNewsQuery {
            ticket: self.sequencer.issue(),
            routed,
        })
    }

    /// Apply a completed fetch. Returns `false` when the result was stale
    /// and discarded; the panel keeps whatever the current query produces.
    pub fn apply_news_response(
        &mut self,
        prepared: &PreparedNewsQuery,
        result: Result<Vec<NewsArticle>, FeedError>,
    ) -> bool {
        if !self.sequencer.is_current(prepared.ticket) {
            debug!(ticket = ?prepared.ticket, "discarding stale news response");
            return false;
        }

        let result = result.map(|records| match &prepared.routed.client_filter {
            Some(selection) => NewsFilterEngine::filter(&records, selection),
            None => records,
        });

        self.news = NewsPanelState::from_result(result);
        true
    }

    /// Route, fetch, and apply in one step. Convenience for callers that
    /// do not interleave queries.
    pub async fn refresh_news(&mut self) -> Result<&NewsPanelState, RouteError> {
        let prepared = self.prepare_news_query()?;
        let feed = Arc::clone(&self.feed);
        let result = feed.news(prepared.routed.query.clone()).await;
        self.apply_news_response(&prepared, result);
        Ok(&self.news)
    }

    pub async fn load_timeline(&self) -> Result<Vec<TimeSeriesPoint>, FeedError> {
        self.feed
            .timeline(TimelineRequest {
                symbol: self.symbol.clone(),
                window: self.window,
            })
            .await
    }

    pub async fn load_market(&self) -> Result<Vec<MarketBar>, FeedError> {
        self.feed
            .market(MarketRequest {
                symbol: self.symbol.clone(),
                window: self.window,
            })
            .await
    }
}
