use std::future::Future;
use std::pin::Pin;

use time::{Date, Month};

use crate::data_source::{
    DataFeed, FeedCapabilities, FeedError, FeedId, MarketRequest, TimelineRequest,
};
use crate::query::NewsQuery;
use crate::{DateKey, MarketBar, NewsArticle, Symbol, TimeSeriesPoint};

const SOURCES: [&str; 5] = [
    "Bloomberg",
    "CNBC",
    "Financial Times",
    "Wall Street Journal",
    "Reuters",
];

const POSITIVE_TITLES: [&str; 5] = [
    "Tech Stocks Surge as AI Adoption Accelerates",
    "Market Rally Continues on Strong Earnings",
    "Economic Growth Exceeds Expectations",
    "Global Supply Chain Issues Begin to Ease",
    "Central Bank Signals Continued Support",
];

const NEGATIVE_TITLES: [&str; 5] = [
    "Inflation Concerns Weigh on Markets",
    "Tech Selloff Deepens Amid Valuation Concerns",
    "Federal Reserve Signals Potential Rate Hike",
    "Retail Sales Decline for Second Consecutive Month",
    "Manufacturing Activity Slows Unexpectedly",
];

const NEUTRAL_TITLES: [&str; 5] = [
    "Markets Mixed Ahead of Earnings Season",
    "Oil Prices Stabilize Following Production Agreement",
    "Investors Await Key Economic Data",
    "Global Markets Show Muted Response to Policy Changes",
    "Trading Volume Below Average as Holiday Approaches",
];

/// Offline feed with deterministic seeded data.
///
/// Every record is a pure function of the seed and its calendar day (plus
/// the symbol for prices), so the same day returns the same articles
/// regardless of which query shape asked for it, and repeated calls are
/// byte-identical. Used for local preview and as the offline default feed.
#[derive(Debug, Clone)]
pub struct FixtureFeed {
    seed: u64,
    anchor: Date,
    capabilities: FeedCapabilities,
}

impl Default for FixtureFeed {
    fn default() -> Self {
        Self {
            seed: 7,
            // Last generated day; keeps output stable across wall-clock time.
            anchor: Date::from_calendar_date(2025, Month::April, 12)
                .expect("anchor is a valid calendar date"),
            capabilities: FeedCapabilities::full(),
        }
    }
}

impl FixtureFeed {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Restrict the natively served date shapes, e.g. to exercise the
    /// client-side filtering fallback.
    pub fn with_capabilities(mut self, capabilities: FeedCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    fn day_rng(&self, scope: &str, date: &DateKey) -> fastrand::Rng {
        let mut hash = self.seed ^ 0xcbf2_9ce4_8422_2325;
        for byte in scope.bytes().chain(date.as_str().bytes()) {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        fastrand::Rng::with_seed(hash)
    }

    fn window_days(&self, days: u32) -> Result<Vec<Date>, FeedError> {
        if days == 0 {
            return Err(FeedError::invalid_request(
                "window must cover at least one day",
            ));
        }

        let mut dates = Vec::with_capacity(days as usize);
        let mut current = self.anchor;
        for _ in 0..days {
            dates.push(current);
            current = current
                .previous_day()
                .ok_or_else(|| FeedError::invalid_request("window extends before the calendar"))?;
        }
        dates.reverse();
        Ok(dates)
    }

    fn span_days(start: &DateKey, end: &DateKey) -> Vec<Date> {
        let mut dates = Vec::new();
        let mut current = to_date(start);
        let last = to_date(end);
        while current <= last {
            dates.push(current);
            current = match current.next_day() {
                Some(next) => next,
                None => break,
            };
        }
        dates
    }

    // News is symbol-agnostic, like the upstream news feed; only prices
    // vary per symbol.
    fn news_for_day(&self, date: &DateKey) -> Vec<NewsArticle> {
        let mut rng = self.day_rng("news", date);
        let count = rng.u32(0..=3);
        let id_base = rng.u64(..u64::MAX / 8);

        (0..count)
            .map(|index| {
                let sentiment = rng.f64() * 2.0 - 1.0;
                let title = if sentiment > 0.3 {
                    POSITIVE_TITLES[rng.usize(..POSITIVE_TITLES.len())]
                } else if sentiment < -0.3 {
                    NEGATIVE_TITLES[rng.usize(..NEGATIVE_TITLES.len())]
                } else {
                    NEUTRAL_TITLES[rng.usize(..NEUTRAL_TITLES.len())]
                };
                let source = SOURCES[rng.usize(..SOURCES.len())];

                NewsArticle::new(
                    id_base + u64::from(index),
                    title,
                    source,
                    date.clone(),
                    sentiment,
                    format!("Fixture summary for '{title}' on {date}."),
                )
                .expect("generated sentiment is within range")
            })
            .collect()
    }

    fn price_at(&self, symbol: &Symbol, dates: &[Date], index: usize) -> f64 {
        // Walk anchored at the window start; per-day steps are seeded so
        // the same window always produces the same series.
        let mut price = if symbol.as_str() == "AAPL" { 150.0 } else { 100.0 };
        let scope = format!("walk:{symbol}");
        for date in &dates[..=index] {
            let key = DateKey::from(*date);
            let mut rng = self.day_rng(&scope, &key);
            price = (price + (rng.f64() - 0.5) * 5.0).max(5.0);
        }
        price
    }

    fn news_query(&self, query: &NewsQuery) -> Result<Vec<NewsArticle>, FeedError> {
        if !self.capabilities.supports(query) {
            return Err(FeedError::unsupported_query_shape(query.shape()));
        }

        let dates = match query {
            NewsQuery::SingleDate { date, .. } => vec![to_date(date)],
            NewsQuery::DateRange { start, end, .. } => Self::span_days(start, end),
            NewsQuery::DefaultWindow { days, .. } => self.window_days(*days)?,
        };

        let mut articles = Vec::new();
        for date in dates {
            articles.extend(self.news_for_day(&DateKey::from(date)));
        }
        Ok(articles)
    }

    fn timeline_window(&self, req: &TimelineRequest) -> Result<Vec<TimeSeriesPoint>, FeedError> {
        let dates = self.window_days(req.window.days())?;

        dates
            .iter()
            .enumerate()
            .map(|(index, date)| {
                let key = DateKey::from(*date);
                let day_news = self.news_for_day(&key);
                let sentiment = if day_news.is_empty() {
                    0.0
                } else {
                    day_news.iter().map(|n| n.sentiment).sum::<f64>() / day_news.len() as f64
                };

                let mut rng = self.day_rng(&format!("volume:{}", req.symbol), &key);
                TimeSeriesPoint::new(
                    key,
                    self.price_at(&req.symbol, &dates, index),
                    rng.u64(0..1_000_000),
                    sentiment,
                    day_news.len() as u32,
                )
                .map_err(|err| FeedError::internal(err.to_string()))
            })
            .collect()
    }

    fn market_window(&self, req: &MarketRequest) -> Result<Vec<MarketBar>, FeedError> {
        let dates = self.window_days(req.window.days())?;

        dates
            .iter()
            .enumerate()
            .map(|(index, date)| {
                let key = DateKey::from(*date);
                let open = self.price_at(&req.symbol, &dates, index);

                let mut rng = self.day_rng(&format!("bar:{}", req.symbol), &key);
                let close = open + (rng.f64() - 0.5) * 3.0;
                let high = open.max(close) + rng.f64() * 2.0;
                let low = (open.min(close) - rng.f64() * 2.0).max(0.0);
                let volume = 500_000 + rng.u64(0..1_000_000);

                MarketBar::new(key, open, high, low, close, volume)
                    .map_err(|err| FeedError::internal(err.to_string()))
            })
            .collect()
    }
}

fn to_date(key: &DateKey) -> Date {
    let text = key.as_str();
    let year: i32 = text[..4].parse().expect("canonical date key year");
    let month: u8 = text[5..7].parse().expect("canonical date key month");
    let day: u8 = text[8..10].parse().expect("canonical date key day");
    Date::from_calendar_date(
        year,
        Month::try_from(month).expect("canonical date key month"),
        day,
    )
    .expect("canonical date key")
}

impl DataFeed for FixtureFeed {
    fn id(&self) -> FeedId {
        FeedId::Fixture
    }

    fn capabilities(&self) -> FeedCapabilities {
        self.capabilities
    }

    fn timeline<'a>(
        &'a self,
        req: TimelineRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<TimeSeriesPoint>, FeedError>> + Send + 'a>> {
        Box::pin(async move { self.timeline_window(&req) })
    }

    fn market<'a>(
        &'a self,
        req: MarketRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MarketBar>, FeedError>> + Send + 'a>> {
        Box::pin(async move { self.market_window(&req) })
    }

    fn news<'a>(
        &'a self,
        query: NewsQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<NewsArticle>, FeedError>> + Send + 'a>> {
        Box::pin(async move { self.news_query(&query) })
    }

    fn news_item<'a>(
        &'a self,
        id: u64,
    ) -> Pin<Box<dyn Future<Output = Result<NewsArticle, FeedError>> + Send + 'a>> {
        Box::pin(async move {
            let window = self.window_days(365)?;
            for date in window {
                let key = DateKey::from(date);
                if let Some(article) = self
                    .news_for_day(&key)
                    .into_iter()
                    .find(|article| article.id == id)
                {
                    return Ok(article);
                }
            }
            Err(FeedError::not_found(format!("news item {id} not found")))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TimeWindow;

    fn date(key: &str) -> DateKey {
        DateKey::normalize(key).expect("valid date")
    }

    #[tokio::test]
    async fn repeated_queries_are_deterministic() {
        let feed = FixtureFeed::default();
        let query = NewsQuery::DefaultWindow {
            symbol: Symbol::general(),
            days: 14,
        };

        let first = feed.news(query.clone()).await.expect("must fetch");
        let second = feed.news(query).await.expect("must fetch");

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn single_date_agrees_with_window_subset() {
        let feed = FixtureFeed::default();
        let symbol = Symbol::general();
        let d = date("2025-04-06");

        let windowed = feed
            .news(NewsQuery::DefaultWindow {
                symbol: symbol.clone(),
                days: 30,
            })
            .await
            .expect("must fetch");
        let single = feed
            .news(NewsQuery::SingleDate {
                symbol,
                date: d.clone(),
            })
            .await
            .expect("must fetch");

        let subset: Vec<NewsArticle> = windowed
            .into_iter()
            .filter(|article| article.date == d)
            .collect();
        assert_eq!(single, subset);
    }

    #[tokio::test]
    async fn timeline_is_sorted_and_aggregated() {
        let feed = FixtureFeed::default();
        let points = feed
            .timeline(TimelineRequest {
                symbol: Symbol::general(),
                window: TimeWindow::OneMonth,
            })
            .await
            .expect("must fetch");

        assert_eq!(points.len(), 30);
        for pair in points.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
        for point in &points {
            assert!((-1.0..=1.0).contains(&point.sentiment));
        }
    }

    #[tokio::test]
    async fn market_bars_respect_ohlc_invariants() {
        let feed = FixtureFeed::default();
        let bars = feed
            .market(MarketRequest {
                symbol: Symbol::parse("AAPL").expect("valid symbol"),
                window: TimeWindow::ThreeMonths,
            })
            .await
            .expect("must fetch");

        assert_eq!(bars.len(), 90);
        for bar in &bars {
            assert!(bar.high >= bar.low);
            assert!(bar.open >= bar.low && bar.open <= bar.high);
            assert!(bar.close >= bar.low && bar.close <= bar.high);
        }
    }

    #[tokio::test]
    async fn window_only_feed_rejects_date_shapes() {
        let feed = FixtureFeed::default().with_capabilities(FeedCapabilities::window_only());

        let err = feed
            .news(NewsQuery::SingleDate {
                symbol: Symbol::general(),
                date: date("2025-04-06"),
            })
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), "feed.unsupported_query_shape");
    }

    #[tokio::test]
    async fn unknown_news_item_is_not_found() {
        let feed = FixtureFeed::default();

        let err = feed.news_item(u64::MAX).await.expect_err("must fail");
        assert_eq!(err.code(), "feed.not_found");
    }
}
