mod date_key;
mod models;
mod symbol;
mod window;

pub use date_key::DateKey;
pub use models::{MarketBar, NewsArticle, SentimentLabel, TimeSeriesPoint};
pub use symbol::Symbol;
pub use window::TimeWindow;
