//! Column layout of raw quote tables.
//!
//! Names follow the headers common quote downloaders emit, so a table pulled
//! from Yahoo, read from CSV, or assembled in memory all look the same.

use super::provider::QuoteError;
use polars::prelude::*;

pub const DATE: &str = "Date";
pub const OPEN: &str = "Open";
pub const HIGH: &str = "High";
pub const LOW: &str = "Low";
pub const CLOSE: &str = "Close";
pub const ADJ_CLOSE: &str = "Adj Close";
pub const VOLUME: &str = "Volume";
pub const DIVIDENDS: &str = "Dividends";
pub const STOCK_SPLITS: &str = "Stock Splits";
pub const CAPITAL_GAINS: &str = "Capital Gains";

/// Columns that carry no information once a price frame has been built.
pub const PRICE_FRAME_DROPPED: [&str; 5] = [STOCK_SPLITS, OPEN, HIGH, LOW, CLOSE];

/// Expected schema for raw quote data
pub struct QuoteSchema;

impl QuoteSchema {
    /// Canonical raw quote schema (without the optional capital-gains column).
    pub fn schema() -> Schema {
        Schema::from_iter(vec![
            Field::new(DATE.into(), DataType::Date),
            Field::new(OPEN.into(), DataType::Float64),
            Field::new(HIGH.into(), DataType::Float64),
            Field::new(LOW.into(), DataType::Float64),
            Field::new(CLOSE.into(), DataType::Float64),
            Field::new(ADJ_CLOSE.into(), DataType::Float64),
            Field::new(VOLUME.into(), DataType::UInt64),
            Field::new(DIVIDENDS.into(), DataType::Float64),
            Field::new(STOCK_SPLITS.into(), DataType::Float64),
        ])
    }

    /// Validate a raw quote table: every canonical column present, `Date` typed as a date.
    ///
    /// Numeric columns are not type-checked here; the price frame builder
    /// casts them.
    pub fn validate(df: &DataFrame) -> Result<(), QuoteError> {
        let expected = Self::schema();
        let names: Vec<&str> = expected.iter_names().map(|n| n.as_str()).collect();
        Self::require(df, &names)?;

        let actual = df.schema();
        if let Some(dtype) = actual.get(DATE) {
            if dtype != &DataType::Date {
                return Err(QuoteError::TypeMismatch {
                    column: DATE.to_string(),
                    expected: DataType::Date,
                    actual: dtype.clone(),
                });
            }
        }
        Ok(())
    }

    /// Fail with `MissingColumn` for the first of `columns` absent from `df`.
    pub fn require(df: &DataFrame, columns: &[&str]) -> Result<(), QuoteError> {
        let actual = df.schema();
        for name in columns {
            if !actual.contains(name) {
                return Err(QuoteError::MissingColumn {
                    column: name.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::frame::{quote_frame, RawQuoteRow};
    use chrono::NaiveDate;

    fn row() -> RawQuoteRow {
        RawQuoteRow {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 400.0,
            high: 405.0,
            low: 399.0,
            close: 403.0,
            adj_close: 401.5,
            volume: 1_000_000,
            dividends: 0.0,
            stock_splits: 0.0,
            capital_gains: None,
        }
    }

    #[test]
    fn test_schema_has_all_required_columns() {
        let schema = QuoteSchema::schema();
        for name in [DATE, OPEN, HIGH, LOW, CLOSE, ADJ_CLOSE, VOLUME, DIVIDENDS, STOCK_SPLITS] {
            assert!(schema.contains(name), "missing {name}");
        }
        assert!(!schema.contains(CAPITAL_GAINS));
    }

    #[test]
    fn test_validate_accepts_quote_frame() {
        let df = quote_frame(&[row()], false).unwrap();
        assert!(QuoteSchema::validate(&df).is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_column() {
        let df = quote_frame(&[row()], false).unwrap().drop(STOCK_SPLITS).unwrap();
        let err = QuoteSchema::validate(&df).unwrap_err();
        assert!(matches!(err, QuoteError::MissingColumn { ref column } if column == STOCK_SPLITS));
    }

    #[test]
    fn test_validate_rejects_string_dates() {
        let df = df!(
            DATE => &["2024-01-02"],
            OPEN => &[400.0],
            HIGH => &[405.0],
            LOW => &[399.0],
            CLOSE => &[403.0],
            ADJ_CLOSE => &[401.5],
            VOLUME => &[1000u64],
            DIVIDENDS => &[0.0],
            STOCK_SPLITS => &[0.0],
        )
        .unwrap();

        let err = QuoteSchema::validate(&df).unwrap_err();
        assert!(matches!(err, QuoteError::TypeMismatch { .. }));
    }
}
