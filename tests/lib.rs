// Shared fixtures for the behavior test suites.
use std::future::Future;
use std::pin::Pin;

pub use marketlens_core::{
    adapters::FixtureFeed,
    data_source::{
        DataFeed, FeedCapabilities, FeedError, FeedId, MarketRequest, TimelineRequest,
    },
    query::NewsQuery,
    selection::{order, Selection, SelectionMode},
    DateKey, ExplorerSession, MarketBar, NewsArticle, NewsFilterEngine, NewsPanelState,
    NewsQueryRouter, Symbol, TimeSeriesPoint, TimeWindow,
};
pub use std::sync::Arc;

pub fn date(key: &str) -> DateKey {
    DateKey::normalize(key).expect("valid date")
}

pub fn article(id: u64, key: &str) -> NewsArticle {
    NewsArticle::new(
        id,
        format!("article {id}"),
        "Reuters",
        date(key),
        0.1,
        "fixture summary",
    )
    .expect("valid article")
}

/// Feed with a fixed record set, used where deterministic article-level
/// expectations matter. Serves only the default window shape so the
/// session exercises its client-side filtering fallback.
pub struct ScriptedFeed {
    pub records: Vec<NewsArticle>,
    pub capabilities: FeedCapabilities,
}

impl ScriptedFeed {
    pub fn window_only(records: Vec<NewsArticle>) -> Self {
        Self {
            records,
            capabilities: FeedCapabilities::window_only(),
        }
    }
}

impl DataFeed for ScriptedFeed {
    fn id(&self) -> FeedId {
        FeedId::Fixture
    }

    fn capabilities(&self) -> FeedCapabilities {
        self.capabilities
    }

    fn timeline<'a>(
        &'a self,
        _req: TimelineRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<TimeSeriesPoint>, FeedError>> + Send + 'a>> {
        Box::pin(async move { Ok(Vec::new()) })
    }

    fn market<'a>(
        &'a self,
        _req: MarketRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MarketBar>, FeedError>> + Send + 'a>> {
        Box::pin(async move { Ok(Vec::new()) })
    }

    fn news<'a>(
        &'a self,
        query: NewsQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<NewsArticle>, FeedError>> + Send + 'a>> {
        Box::pin(async move {
            if !self.capabilities.supports(&query) {
                return Err(FeedError::unsupported_query_shape(query.shape()));
            }
            Ok(self.records.clone())
        })
    }

    fn news_item<'a>(
        &'a self,
        id: u64,
    ) -> Pin<Box<dyn Future<Output = Result<NewsArticle, FeedError>> + Send + 'a>> {
        Box::pin(async move {
            self.records
                .iter()
                .find(|record| record.id == id)
                .cloned()
                .ok_or_else(|| FeedError::not_found(format!("news item {id} not found")))
        })
    }
}

/// Feed whose every fetch fails with a transport error.
pub struct FailingFeed;

impl DataFeed for FailingFeed {
    fn id(&self) -> FeedId {
        FeedId::Http
    }

    fn capabilities(&self) -> FeedCapabilities {
        FeedCapabilities::full()
    }

    fn timeline<'a>(
        &'a self,
        _req: TimelineRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<TimeSeriesPoint>, FeedError>> + Send + 'a>> {
        Box::pin(async move { Err(FeedError::transport("connection refused")) })
    }

    fn market<'a>(
        &'a self,
        _req: MarketRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MarketBar>, FeedError>> + Send + 'a>> {
        Box::pin(async move { Err(FeedError::transport("connection refused")) })
    }

    fn news<'a>(
        &'a self,
        _query: NewsQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<NewsArticle>, FeedError>> + Send + 'a>> {
        Box::pin(async move { Err(FeedError::transport("connection refused")) })
    }

    fn news_item<'a>(
        &'a self,
        _id: u64,
    ) -> Pin<Box<dyn Future<Output = Result<NewsArticle, FeedError>> + Send + 'a>> {
        Box::pin(async move { Err(FeedError::transport("connection refused")) })
    }
}
