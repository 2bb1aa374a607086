use crate::data::frame::date_series;
use crate::data::provider::QuoteError;
use crate::data::schema::{ADJ_CLOSE, DATE, DIVIDENDS};
use crate::domain::PaymentCadence;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DAYS_BETWEEN: &str = "Days Between";
pub const YEAR_DIVIDEND_PAYMENT: &str = "Year Dividend Payment";
pub const DIVIDEND_YIELD: &str = "Dividend Yield";

#[derive(Debug, Error)]
pub enum DividendError {
    #[error("insufficient dividend history: {payments} payment(s), at least 2 needed to infer a cadence")]
    InsufficientHistory { payments: usize },

    #[error("non-positive adjusted close {adj_close} on {date}, yield is undefined")]
    NonPositiveClose { date: NaiveDate, adj_close: f64 },

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error("frame error: {0}")]
    Frame(#[from] PolarsError),
}

/// One dividend payment with its derived trailing figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendRecord {
    pub date: NaiveDate,
    pub adj_close: f64,
    pub dividends: f64,
    /// Days since the previous payment; `None` for the first payment.
    pub days_between: Option<i64>,
    /// Sum of the most recent payments covering one year; `None` until the window fills.
    pub trailing_sum: Option<f64>,
    /// `trailing_sum / adj_close`, rounded to five decimals.
    pub dividend_yield: Option<f64>,
}

/// Dividend payments of one instrument plus the inferred cadence.
///
/// With fewer than two payments the cadence is unknown, every record keeps
/// `trailing_sum` and `dividend_yield` empty, and [`DividendHistory::cadence`]
/// reports [`DividendError::InsufficientHistory`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendHistory {
    records: Vec<DividendRecord>,
    median_gap_days: Option<i64>,
    cadence: Option<PaymentCadence>,
}

impl DividendHistory {
    pub(crate) fn new(
        records: Vec<DividendRecord>,
        median_gap_days: Option<i64>,
        cadence: Option<PaymentCadence>,
    ) -> Self {
        Self {
            records,
            median_gap_days,
            cadence,
        }
    }

    pub fn records(&self) -> &[DividendRecord] {
        &self.records
    }

    pub fn payment_count(&self) -> usize {
        self.records.len()
    }

    pub fn median_gap_days(&self) -> Option<i64> {
        self.median_gap_days
    }

    pub fn cadence(&self) -> Result<PaymentCadence, DividendError> {
        self.cadence.ok_or(DividendError::InsufficientHistory {
            payments: self.records.len(),
        })
    }

    /// Whether enough payments exist to infer a cadence.
    pub fn is_established(&self) -> bool {
        self.cadence.is_some()
    }

    /// The yield on the most recent payment date with a full trailing window.
    pub fn latest_yield(&self) -> Option<f64> {
        self.records.iter().rev().find_map(|r| r.dividend_yield)
    }

    /// Tabular view: date, adjusted close, dividend, gap, trailing sum, yield.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let dates: Vec<NaiveDate> = self.records.iter().map(|r| r.date).collect();
        DataFrame::new(vec![
            date_series(DATE, &dates)?.into(),
            Series::new(
                ADJ_CLOSE.into(),
                self.records.iter().map(|r| r.adj_close).collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                DIVIDENDS.into(),
                self.records.iter().map(|r| r.dividends).collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                DAYS_BETWEEN.into(),
                self.records.iter().map(|r| r.days_between).collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                YEAR_DIVIDEND_PAYMENT.into(),
                self.records.iter().map(|r| r.trailing_sum).collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                DIVIDEND_YIELD.into(),
                self.records.iter().map(|r| r.dividend_yield).collect::<Vec<_>>(),
            )
            .into(),
        ])
    }
}
