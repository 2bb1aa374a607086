//! In-memory quote source for tests and offline use.

use super::provider::{QuoteError, QuoteSource};
use polars::prelude::DataFrame;
use std::cell::Cell;
use std::collections::HashMap;

/// Quote source serving pre-built tables keyed by ticker.
///
/// Counts fetches so callers can check how many times a ticker was pulled.
#[derive(Debug, Default)]
pub struct InMemorySource {
    tables: HashMap<String, DataFrame>,
    fetches: Cell<usize>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, ticker: &str, table: DataFrame) -> Self {
        self.insert(ticker, table);
        self
    }

    pub fn insert(&mut self, ticker: &str, table: DataFrame) {
        self.tables.insert(ticker.to_string(), table);
    }

    /// Number of `fetch` calls served so far, including failed lookups.
    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }
}

impl QuoteSource for InMemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch(&self, ticker: &str) -> Result<DataFrame, QuoteError> {
        self.fetches.set(self.fetches.get() + 1);
        self.tables
            .get(ticker)
            .cloned()
            .ok_or_else(|| QuoteError::TickerNotFound {
                ticker: ticker.to_string(),
            })
    }
}
