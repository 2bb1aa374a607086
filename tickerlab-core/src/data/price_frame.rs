//! Price frame builder: raw quote table to the trimmed price table.
//!
//! The price frame keeps `Date`, `Adj Close` (rounded to cents), `Volume`,
//! `Dividends`, plus any extra columns the source delivered (such as
//! `Capital Gains`) for the instrument pipeline to prune.

use super::canonicalize::Canonicalizer;
use super::frame::{date_values, f64_values, u64_values};
use super::provider::QuoteError;
use super::schema::*;
use crate::domain::PriceRecord;
use polars::prelude::*;

/// Decimal places kept on `Adj Close`.
pub const ADJ_CLOSE_DECIMALS: u32 = 2;

/// Build the price frame from a raw quote table.
///
/// Fails with `MissingColumn` when the table does not carry every canonical
/// quote column.
pub fn build_price_frame(raw: DataFrame) -> Result<DataFrame, QuoteError> {
    QuoteSchema::validate(&raw)?;

    let trimmed = raw.drop_many(PRICE_FRAME_DROPPED);
    let frame = Canonicalizer::canonicalize(trimmed.lazy())
        .with_columns([
            col(ADJ_CLOSE).cast(DataType::Float64),
            col(VOLUME).cast(DataType::UInt64),
            col(DIVIDENDS).cast(DataType::Float64),
        ])
        .collect()?;

    round_adj_close(frame)
}

/// Round `Adj Close` to [`ADJ_CLOSE_DECIMALS`] places.
pub fn round_adj_close(df: DataFrame) -> Result<DataFrame, QuoteError> {
    QuoteSchema::require(&df, &[ADJ_CLOSE])?;
    Ok(df
        .lazy()
        .with_column(col(ADJ_CLOSE).round(ADJ_CLOSE_DECIMALS))
        .collect()?)
}

/// Read a price frame back as typed records, in date order.
pub fn price_records(df: &DataFrame) -> Result<Vec<PriceRecord>, QuoteError> {
    QuoteSchema::require(df, &[DATE, ADJ_CLOSE, VOLUME, DIVIDENDS])?;

    let dates = date_values(df)?;
    let closes = f64_values(df, ADJ_CLOSE)?;
    let volumes = u64_values(df, VOLUME)?;
    let dividends = f64_values(df, DIVIDENDS)?;

    Ok(dates
        .into_iter()
        .zip(closes)
        .zip(volumes)
        .zip(dividends)
        .map(|(((date, adj_close), volume), dividends)| PriceRecord {
            date,
            adj_close,
            volume,
            dividends,
        })
        .collect())
}
