use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{DateKey, ValidationError};

/// One day of the aggregated market timeline: price, volume, the mean
/// sentiment of that day's news, and how many articles landed on the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: DateKey,
    pub price: f64,
    pub volume: u64,
    pub sentiment: f64,
    pub news_count: u32,
}

impl TimeSeriesPoint {
    pub fn new(
        date: DateKey,
        price: f64,
        volume: u64,
        sentiment: f64,
        news_count: u32,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("price", price)?;
        validate_sentiment(sentiment)?;

        Ok(Self {
            date,
            price,
            volume,
            sentiment,
            news_count,
        })
    }
}

/// OHLCV bar for the market chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketBar {
    pub date: DateKey,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl MarketBar {
    pub fn new(
        date: DateKey,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;

        if high < low {
            return Err(ValidationError::InvalidBarRange);
        }

        if open < low || open > high || close < low || close > high {
            return Err(ValidationError::InvalidBarBounds);
        }

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// Immutable news record as returned by the fetch collaborator.
///
/// A query's result set is discarded and replaced wholesale on every new
/// query; nothing in the core mutates an article after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: u64,
    pub title: String,
    pub source: String,
    pub date: DateKey,
    pub sentiment: f64,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub raw_fields: BTreeMap<String, Value>,
}

impl NewsArticle {
    pub fn new(
        id: u64,
        title: impl Into<String>,
        source: impl Into<String>,
        date: DateKey,
        sentiment: f64,
        summary: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyArticleTitle);
        }
        validate_sentiment(sentiment)?;

        Ok(Self {
            id,
            title,
            source: source.into(),
            date,
            sentiment,
            summary: summary.into(),
            link: None,
            raw_fields: BTreeMap::new(),
        })
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_raw_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.raw_fields.insert(name.into(), value);
        self
    }

    pub fn sentiment_label(&self) -> SentimentLabel {
        SentimentLabel::from_score(self.sentiment)
    }
}

/// Coarse sentiment bucket shown on article badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Bucket a sentiment score; the thresholds match the article badges.
    pub fn from_score(score: f64) -> Self {
        if score > 0.3 {
            Self::Positive
        } else if score < -0.3 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl Display for SentimentLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

fn validate_sentiment(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || !(-1.0..=1.0).contains(&value) {
        return Err(ValidationError::SentimentOutOfRange { value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(key: &str) -> DateKey {
        DateKey::normalize(key).expect("valid date")
    }

    #[test]
    fn rejects_sentiment_outside_range() {
        let err = TimeSeriesPoint::new(date("2025-04-06"), 100.0, 1_000, 1.5, 0)
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::SentimentOutOfRange { .. }));
    }

    #[test]
    fn rejects_inverted_bar_range() {
        let err = MarketBar::new(date("2025-04-06"), 10.0, 9.0, 11.0, 10.0, 1_000)
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidBarRange));
    }

    #[test]
    fn rejects_close_outside_bounds() {
        let err = MarketBar::new(date("2025-04-06"), 10.0, 11.0, 9.0, 12.0, 1_000)
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidBarBounds));
    }

    #[test]
    fn buckets_sentiment_scores() {
        assert_eq!(SentimentLabel::from_score(0.8), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_score(0.3), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(-0.7), SentimentLabel::Negative);
    }

    #[test]
    fn rejects_blank_article_title() {
        let err = NewsArticle::new(1, "  ", "Reuters", date("2025-04-06"), 0.2, "summary")
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::EmptyArticleTitle));
    }
}
