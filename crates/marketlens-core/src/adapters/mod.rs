mod fixture;
mod http;

pub use fixture::FixtureFeed;
pub use http::HttpFeed;
