use super::price::PriceRecord;
use super::profile::InstrumentProfile;
use crate::data::price_frame::{build_price_frame, price_records};
use crate::data::provider::{QuoteError, QuoteSource};
use crate::dividends::{DividendError, DividendHistory};
use crate::pipeline::{self, InstrumentState};
use log::info;
use polars::prelude::{DataFrame, PolarsError};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstrumentError {
    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error(transparent)]
    Dividend(#[from] DividendError),

    #[error("frame error: {0}")]
    Frame(#[from] PolarsError),
}

/// A ticker with its cleaned price frame and, for dividend payers, its
/// dividend history.
///
/// Built once from a single fetch; the tables are not mutated afterwards.
#[derive(Debug, Clone)]
pub struct Instrument {
    ticker: String,
    profile: InstrumentProfile,
    prices: DataFrame,
    dividends: Option<DividendHistory>,
}

impl Instrument {
    /// Fetch `ticker` from `source` and run the pipeline `profile` selects.
    pub fn build(
        source: &dyn QuoteSource,
        ticker: &str,
        profile: InstrumentProfile,
    ) -> Result<Self, InstrumentError> {
        let raw = source.fetch(ticker)?;
        let instrument = Self::from_quotes(ticker, raw, profile)?;
        info!(
            "built {ticker} from {}: {} price rows, {} dividend payments",
            source.name(),
            instrument.prices.height(),
            instrument.dividends.as_ref().map_or(0, |d| d.payment_count())
        );
        Ok(instrument)
    }

    /// Run the pipeline over an already-fetched raw quote table.
    pub fn from_quotes(
        ticker: &str,
        raw: DataFrame,
        profile: InstrumentProfile,
    ) -> Result<Self, InstrumentError> {
        let prices = build_price_frame(raw)?;
        let state = pipeline::run(ticker, &profile.transforms(), InstrumentState::new(prices))?;
        Ok(Self {
            ticker: ticker.to_string(),
            profile,
            prices: state.prices,
            dividends: state.dividends,
        })
    }

    pub fn stock(source: &dyn QuoteSource, ticker: &str) -> Result<Self, InstrumentError> {
        Self::build(source, ticker, InstrumentProfile::STOCK)
    }

    pub fn etf(source: &dyn QuoteSource, ticker: &str) -> Result<Self, InstrumentError> {
        Self::build(source, ticker, InstrumentProfile::ETF)
    }

    pub fn dividend(source: &dyn QuoteSource, ticker: &str) -> Result<Self, InstrumentError> {
        Self::build(source, ticker, InstrumentProfile::DIVIDEND)
    }

    pub fn dividend_stock(source: &dyn QuoteSource, ticker: &str) -> Result<Self, InstrumentError> {
        Self::build(source, ticker, InstrumentProfile::DIVIDEND_STOCK)
    }

    pub fn dividend_etf(source: &dyn QuoteSource, ticker: &str) -> Result<Self, InstrumentError> {
        Self::build(source, ticker, InstrumentProfile::DIVIDEND_ETF)
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn profile(&self) -> InstrumentProfile {
        self.profile
    }

    pub fn pays_dividends(&self) -> bool {
        self.profile.pays_dividends
    }

    pub fn is_etf(&self) -> bool {
        self.profile.is_etf()
    }

    /// The cleaned price frame.
    pub fn prices(&self) -> &DataFrame {
        &self.prices
    }

    pub fn price_records(&self) -> Result<Vec<PriceRecord>, QuoteError> {
        price_records(&self.prices)
    }

    /// Dividend history; `None` unless the profile pays dividends.
    pub fn dividends(&self) -> Option<&DividendHistory> {
        self.dividends.as_ref()
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--{}-- \n Dividends: {}", self.ticker, self.pays_dividends())
    }
}
