use thiserror::Error;

/// Validation and contract errors exposed by `marketlens-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("date key must be 'YYYY-MM-DD' or an ISO-8601 datetime: '{value}'")]
    InvalidDateKey { value: String },

    #[error("invalid window '{value}', expected one of 1w, 1m, 3m, 1y")]
    InvalidWindow { value: String },
    #[error("invalid feed '{value}', expected one of fixture, http")]
    InvalidFeed { value: String },
    #[error("invalid selection mode '{value}', expected point or range")]
    InvalidSelectionMode { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
    #[error("sentiment {value} outside [-1, 1]")]
    SentimentOutOfRange { value: f64 },

    #[error("bar high must be >= low")]
    InvalidBarRange,
    #[error("bar open/close must be within high/low range")]
    InvalidBarBounds,

    #[error("article title cannot be empty")]
    EmptyArticleTitle,

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}
