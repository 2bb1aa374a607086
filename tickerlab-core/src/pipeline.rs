//! Named transformations layered onto one instrument's price frame.
//!
//! Every transform mutates the same [`InstrumentState`]; composite instruments
//! run several transforms in sequence instead of building a second instrument.

use crate::data::schema::{QuoteSchema, CAPITAL_GAINS};
use crate::dividends::{DividendAnalyzer, DividendHistory};
use crate::domain::InstrumentError;
use log::{debug, warn};
use polars::prelude::DataFrame;

/// Tables owned by one instrument while it is being built.
#[derive(Debug, Clone)]
pub struct InstrumentState {
    pub prices: DataFrame,
    pub dividends: Option<DividendHistory>,
}

impl InstrumentState {
    pub fn new(prices: DataFrame) -> Self {
        Self {
            prices,
            dividends: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transform {
    /// Remove the `Capital Gains` column ETF downloads carry.
    DropCapitalGains,
    /// Run the dividend analyzer over the price frame.
    DeriveDividends,
}

impl Transform {
    pub const fn name(self) -> &'static str {
        match self {
            Self::DropCapitalGains => "drop_capital_gains",
            Self::DeriveDividends => "derive_dividends",
        }
    }

    pub fn apply(self, ticker: &str, state: &mut InstrumentState) -> Result<(), InstrumentError> {
        debug!("{ticker}: {}", self.name());
        match self {
            Self::DropCapitalGains => {
                QuoteSchema::require(&state.prices, &[CAPITAL_GAINS])?;
                state.prices = state.prices.drop(CAPITAL_GAINS)?;
            }
            Self::DeriveDividends => {
                let history = DividendAnalyzer::analyze_frame(&state.prices)?;
                if let Err(e) = history.cadence() {
                    warn!("{ticker}: {e}");
                }
                state.dividends = Some(history);
            }
        }
        Ok(())
    }
}

/// Apply `transforms` in order to `state`.
pub fn run(
    ticker: &str,
    transforms: &[Transform],
    mut state: InstrumentState,
) -> Result<InstrumentState, InstrumentError> {
    for step in transforms {
        step.apply(ticker, &mut state)?;
    }
    Ok(state)
}
