//! Quote source trait and structured error types.
//!
//! The QuoteSource trait abstracts over where raw daily history comes from
//! (Yahoo Finance, CSV files, an in-memory map) so instruments can be built
//! against any of them and tests never touch the network.

use polars::prelude::{DataFrame, DataType, PolarsError};
use thiserror::Error;

/// Structured error types for quote fetching and table shape.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("ticker not found: {ticker}")]
    TickerNotFound { ticker: String },

    #[error("quote table is missing column '{column}'")]
    MissingColumn { column: String },

    #[error("type mismatch in column {column}: expected {expected:?}, got {actual:?}")]
    TypeMismatch {
        column: String,
        expected: DataType,
        actual: DataType,
    },

    #[error("null value in column '{column}'")]
    NullValue { column: String },

    #[error("frame error: {0}")]
    Frame(#[from] PolarsError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("quote error: {0}")]
    Other(String),
}

/// Trait for quote sources.
///
/// `fetch` returns the full daily history for one ticker as a raw quote table
/// (see [`super::schema`]). Failures are terminal; callers do not retry.
pub trait QuoteSource {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch the raw daily quote table for `ticker`.
    fn fetch(&self, ticker: &str) -> Result<DataFrame, QuoteError>;
}

impl<T: QuoteSource + ?Sized> QuoteSource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(&self, ticker: &str) -> Result<DataFrame, QuoteError> {
        (**self).fetch(ticker)
    }
}
