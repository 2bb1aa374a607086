//! Dividend analyzer.
//!
//! Steps, per instrument:
//! 1. keep the rows that paid a dividend (volume is not carried along)
//! 2. measure the gap in days to the previous payment
//! 3. classify the median gap into a [`PaymentCadence`]
//! 4. sum the last `payments_per_year` dividends on each payment date
//! 5. divide by that day's adjusted close for the trailing yield
//!
//! Fewer than two payments leave the cadence unknown; the window sum and yield
//! are then left empty rather than computed over a degenerate window.

use super::history::{DividendError, DividendHistory, DividendRecord};
use crate::data::frame::{date_values, f64_values};
use crate::data::schema::{QuoteSchema, ADJ_CLOSE, DATE, DIVIDENDS};
use crate::domain::{PaymentCadence, PriceRecord};
use chrono::NaiveDate;
use log::debug;
use polars::prelude::*;

/// Decimal places kept on the dividend yield.
pub const YIELD_DECIMALS: i32 = 5;

/// A dividend-paying row, volume already stripped.
#[derive(Debug, Clone, Copy)]
struct Payment {
    date: NaiveDate,
    adj_close: f64,
    dividends: f64,
}

pub struct DividendAnalyzer;

impl DividendAnalyzer {
    /// Analyze a price frame (`Date`, `Adj Close`, `Dividends` required).
    pub fn analyze_frame(prices: &DataFrame) -> Result<DividendHistory, DividendError> {
        QuoteSchema::require(prices, &[DATE, ADJ_CLOSE, DIVIDENDS])?;

        let paid = prices
            .clone()
            .lazy()
            .filter(col(DIVIDENDS).gt(lit(0.0)))
            .select([col(DATE), col(ADJ_CLOSE), col(DIVIDENDS)])
            .collect()?;

        let dates = date_values(&paid)?;
        let closes = f64_values(&paid, ADJ_CLOSE)?;
        let dividends = f64_values(&paid, DIVIDENDS)?;

        let payments: Vec<Payment> = dates
            .into_iter()
            .zip(closes)
            .zip(dividends)
            .map(|((date, adj_close), dividends)| Payment {
                date,
                adj_close,
                dividends,
            })
            .collect();

        Self::from_payments(&payments)
    }

    /// Analyze typed price records in date order.
    pub fn analyze(records: &[PriceRecord]) -> Result<DividendHistory, DividendError> {
        let payments: Vec<Payment> = records
            .iter()
            .filter(|r| r.pays_dividend())
            .map(|r| Payment {
                date: r.date,
                adj_close: r.adj_close,
                dividends: r.dividends,
            })
            .collect();

        Self::from_payments(&payments)
    }

    fn from_payments(payments: &[Payment]) -> Result<DividendHistory, DividendError> {
        let gaps: Vec<Option<i64>> = std::iter::once(None)
            .chain(
                payments
                    .windows(2)
                    .map(|w| Some((w[1].date - w[0].date).num_days())),
            )
            .take(payments.len())
            .collect();

        let median_gap = median_days(gaps.iter().flatten().copied().collect());
        let cadence = median_gap.and_then(|days| PaymentCadence::from_gap_days(days as f64));
        debug!(
            "{} payments, median gap {median_gap:?} days, cadence {cadence:?}",
            payments.len()
        );

        let window = cadence.map(PaymentCadence::payments_per_year);
        let mut records = Vec::with_capacity(payments.len());
        for (i, (payment, days_between)) in payments.iter().zip(gaps).enumerate() {
            let trailing_sum = window
                .filter(|&n| i + 1 >= n)
                .map(|n| payments[i + 1 - n..=i].iter().map(|p| p.dividends).sum::<f64>());

            let dividend_yield = match trailing_sum {
                Some(sum) => {
                    if !(payment.adj_close > 0.0) {
                        return Err(DividendError::NonPositiveClose {
                            date: payment.date,
                            adj_close: payment.adj_close,
                        });
                    }
                    Some(round_decimals(sum / payment.adj_close, YIELD_DECIMALS))
                }
                None => None,
            };

            records.push(DividendRecord {
                date: payment.date,
                adj_close: payment.adj_close,
                dividends: payment.dividends,
                days_between,
                trailing_sum,
                dividend_yield,
            });
        }

        Ok(DividendHistory::new(records, median_gap, cadence))
    }
}

/// Median of whole-day gaps, truncated to whole days. `None` when empty.
fn median_days(mut gaps: Vec<i64>) -> Option<i64> {
    if gaps.is_empty() {
        return None;
    }
    gaps.sort_unstable();
    let mid = gaps.len() / 2;
    if gaps.len() % 2 == 1 {
        Some(gaps[mid])
    } else {
        Some((gaps[mid - 1] + gaps[mid]).div_euclid(2))
    }
}

fn round_decimals(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
