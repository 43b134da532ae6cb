use std::future::Future;
use std::pin::Pin;

use serde::Deserialize;
use tracing::debug;

use crate::data_source::{
    DataFeed, FeedCapabilities, FeedError, FeedId, MarketRequest, TimelineRequest,
};
use crate::query::NewsQuery;
use crate::{DateKey, MarketBar, NewsArticle, TimeSeriesPoint};

/// REST-backed feed.
///
/// Targets the dashboard API: `/api/timeline`, `/api/market/{ticker}`,
/// `/api/news` and `/api/news/{id}`. By default the backend is assumed to
/// honor the full query contract (`date`, `start`/`end` parameters);
/// downgrade with [`HttpFeed::with_capabilities`] when pointing at a
/// backend that only serves the windowed feed, and the session will narrow
/// results client-side instead.
#[derive(Debug, Clone)]
pub struct HttpFeed {
    base_url: String,
    client: reqwest::Client,
    capabilities: FeedCapabilities,
}

#[derive(Debug, Deserialize)]
struct TimelinePointDto {
    date: String,
    price: f64,
    volume: u64,
    sentiment: f64,
    #[serde(rename = "newsCount")]
    news_count: u32,
}

#[derive(Debug, Deserialize)]
struct MarketBarDto {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

#[derive(Debug, Deserialize)]
struct NewsItemDto {
    id: u64,
    title: String,
    source: String,
    date: String,
    sentiment: f64,
    summary: String,
    url: Option<String>,
}

impl HttpFeed {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            client: reqwest::Client::new(),
            capabilities: FeedCapabilities::full(),
        }
    }

    pub fn with_capabilities(mut self, capabilities: FeedCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: String) -> Result<T, FeedError> {
        debug!(%url, "fetching from http feed");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| FeedError::transport(format!("request failed: {err}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(FeedError::not_found(format!("{url} returned 404")));
        }
        if !response.status().is_success() {
            return Err(FeedError::transport(format!(
                "{url} returned status {}",
                response.status()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|err| FeedError::transport(format!("malformed response body: {err}")))
    }

    fn news_url(&self, query: &NewsQuery) -> String {
        let symbol = urlencoding::encode(query.symbol().as_str());
        match query {
            NewsQuery::SingleDate { date, .. } => {
                format!("{}/api/news?symbol={symbol}&date={date}", self.base_url)
            }
            NewsQuery::DateRange { start, end, .. } => format!(
                "{}/api/news?symbol={symbol}&start={start}&end={end}",
                self.base_url
            ),
            NewsQuery::DefaultWindow { days, .. } => {
                format!("{}/api/news?symbol={symbol}&days={days}", self.base_url)
            }
        }
    }
}

fn timeline_point(dto: TimelinePointDto) -> Result<TimeSeriesPoint, FeedError> {
    // Upstream timestamps may carry a time component; truncation keeps the
    // calendar day as served.
    let date = DateKey::normalize(&dto.date)
        .map_err(|err| FeedError::internal(format!("bad timeline date: {err}")))?;
    TimeSeriesPoint::new(date, dto.price, dto.volume, dto.sentiment, dto.news_count)
        .map_err(|err| FeedError::internal(format!("bad timeline point: {err}")))
}

fn market_bar(dto: MarketBarDto) -> Result<MarketBar, FeedError> {
    let date = DateKey::normalize(&dto.date)
        .map_err(|err| FeedError::internal(format!("bad bar date: {err}")))?;
    MarketBar::new(date, dto.open, dto.high, dto.low, dto.close, dto.volume)
        .map_err(|err| FeedError::internal(format!("bad market bar: {err}")))
}

fn news_article(dto: NewsItemDto) -> Result<NewsArticle, FeedError> {
    let date = DateKey::normalize(&dto.date)
        .map_err(|err| FeedError::internal(format!("bad article date: {err}")))?;
    let article = NewsArticle::new(
        dto.id,
        dto.title,
        dto.source,
        date,
        dto.sentiment,
        dto.summary,
    )
    .map_err(|err| FeedError::internal(format!("bad article: {err}")))?;

    Ok(match dto.url {
        Some(url) => article.with_link(url),
        None => article,
    })
}

impl DataFeed for HttpFeed {
    fn id(&self) -> FeedId {
        FeedId::Http
    }

    fn capabilities(&self) -> FeedCapabilities {
        self.capabilities
    }

    fn timeline<'a>(
        &'a self,
        req: TimelineRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<TimeSeriesPoint>, FeedError>> + Send + 'a>> {
        Box::pin(async move {
            let symbol = urlencoding::encode(req.symbol.as_str()).into_owned();
            let url = format!(
                "{}/api/timeline?symbol={symbol}&days={}",
                self.base_url,
                req.window.days()
            );
            let dtos: Vec<TimelinePointDto> = self.get_json(url).await?;
            dtos.into_iter().map(timeline_point).collect()
        })
    }

    fn market<'a>(
        &'a self,
        req: MarketRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MarketBar>, FeedError>> + Send + 'a>> {
        Box::pin(async move {
            let ticker = urlencoding::encode(req.symbol.as_str()).into_owned();
            let url = format!(
                "{}/api/market/{ticker}?days={}",
                self.base_url,
                req.window.days()
            );
            let dtos: Vec<MarketBarDto> = self.get_json(url).await?;
            dtos.into_iter().map(market_bar).collect()
        })
    }

    fn news<'a>(
        &'a self,
        query: NewsQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<NewsArticle>, FeedError>> + Send + 'a>> {
        Box::pin(async move {
            if !self.capabilities.supports(&query) {
                return Err(FeedError::unsupported_query_shape(query.shape()));
            }

            let dtos: Vec<NewsItemDto> = self.get_json(self.news_url(&query)).await?;
            dtos.into_iter().map(news_article).collect()
        })
    }

    fn news_item<'a>(
        &'a self,
        id: u64,
    ) -> Pin<Box<dyn Future<Output = Result<NewsArticle, FeedError>> + Send + 'a>> {
        Box::pin(async move {
            let url = format!("{}/api/news/{id}", self.base_url);
            let dto: NewsItemDto = self.get_json(url).await?;
            news_article(dto)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Symbol;

    fn query_single() -> NewsQuery {
        NewsQuery::SingleDate {
            symbol: Symbol::general(),
            date: DateKey::normalize("2025-04-06").expect("valid date"),
        }
    }

    #[test]
    fn builds_query_urls_per_shape() {
        let feed = HttpFeed::new("http://localhost:8000/");

        assert_eq!(
            feed.news_url(&query_single()),
            "http://localhost:8000/api/news?symbol=GENERAL&date=2025-04-06"
        );
        assert_eq!(
            feed.news_url(&NewsQuery::DefaultWindow {
                symbol: Symbol::general(),
                days: 30,
            }),
            "http://localhost:8000/api/news?symbol=GENERAL&days=30"
        );
    }

    #[test]
    fn maps_dtos_through_domain_validation() {
        let article = news_article(NewsItemDto {
            id: 1,
            title: "Tech Stocks Surge".into(),
            source: "Reuters".into(),
            // Time component must be truncated, not converted.
            date: "2025-04-06T23:30:00Z".into(),
            sentiment: 0.8,
            summary: "summary".into(),
            url: Some("https://example.com/a/1".into()),
        })
        .expect("valid article");

        assert_eq!(article.date.as_str(), "2025-04-06");
        assert_eq!(article.link.as_deref(), Some("https://example.com/a/1"));
    }

    #[test]
    fn rejects_out_of_range_upstream_sentiment() {
        let err = news_article(NewsItemDto {
            id: 1,
            title: "t".into(),
            source: "s".into(),
            date: "2025-04-06".into(),
            sentiment: 2.0,
            summary: "x".into(),
            url: None,
        })
        .expect_err("must fail");

        assert_eq!(err.code(), "feed.internal");
    }

    #[tokio::test]
    async fn window_only_backend_rejects_date_shapes_before_transport() {
        let feed = HttpFeed::new("http://localhost:1")
            .with_capabilities(FeedCapabilities::window_only());

        let err = feed.news(query_single()).await.expect_err("must fail");
        assert_eq!(err.code(), "feed.unsupported_query_shape");
    }
}
