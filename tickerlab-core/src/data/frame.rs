//! Conversions between typed quote rows and polars frames.

use super::provider::QuoteError;
use super::schema::*;
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};

/// Days from 0001-01-01 (CE) to 1970-01-01, the epoch polars stores dates against.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// One raw daily quote row as delivered by a quote source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQuoteRow {
    #[serde(rename = "Date", deserialize_with = "deserialize_date_prefix")]
    pub date: NaiveDate,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Adj Close")]
    pub adj_close: f64,
    #[serde(rename = "Volume")]
    pub volume: u64,
    #[serde(rename = "Dividends")]
    pub dividends: f64,
    #[serde(rename = "Stock Splits")]
    pub stock_splits: f64,
    #[serde(rename = "Capital Gains", default)]
    pub capital_gains: Option<f64>,
}

/// Accepts `2024-01-02` as well as timestamped cells like `2024-01-02 00:00:00-05:00`.
fn deserialize_date_prefix<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let prefix = raw.get(..10).unwrap_or(&raw);
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").map_err(serde::de::Error::custom)
}

pub(crate) fn date_to_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}

pub(crate) fn days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + EPOCH_DAYS_FROM_CE)
}

/// Build a date-typed series from calendar dates.
pub(crate) fn date_series(name: &str, dates: &[NaiveDate]) -> PolarsResult<Series> {
    let days: Vec<i32> = dates.iter().map(|d| date_to_days(*d)).collect();
    Series::new(name.into(), days).cast(&DataType::Date)
}

/// Assemble a raw quote table from typed rows.
///
/// The `Capital Gains` column is only emitted when `with_capital_gains` is set;
/// rows without a value in that column contribute 0.0.
pub fn quote_frame(rows: &[RawQuoteRow], with_capital_gains: bool) -> PolarsResult<DataFrame> {
    let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
    let mut columns: Vec<Column> = vec![
        date_series(DATE, &dates)?.into(),
        Series::new(OPEN.into(), rows.iter().map(|r| r.open).collect::<Vec<_>>()).into(),
        Series::new(HIGH.into(), rows.iter().map(|r| r.high).collect::<Vec<_>>()).into(),
        Series::new(LOW.into(), rows.iter().map(|r| r.low).collect::<Vec<_>>()).into(),
        Series::new(CLOSE.into(), rows.iter().map(|r| r.close).collect::<Vec<_>>()).into(),
        Series::new(ADJ_CLOSE.into(), rows.iter().map(|r| r.adj_close).collect::<Vec<_>>()).into(),
        Series::new(VOLUME.into(), rows.iter().map(|r| r.volume).collect::<Vec<_>>()).into(),
        Series::new(DIVIDENDS.into(), rows.iter().map(|r| r.dividends).collect::<Vec<_>>()).into(),
        Series::new(
            STOCK_SPLITS.into(),
            rows.iter().map(|r| r.stock_splits).collect::<Vec<_>>(),
        )
        .into(),
    ];
    if with_capital_gains {
        columns.push(
            Series::new(
                CAPITAL_GAINS.into(),
                rows.iter()
                    .map(|r| r.capital_gains.unwrap_or(0.0))
                    .collect::<Vec<_>>(),
            )
            .into(),
        );
    }
    DataFrame::new(columns)
}

/// Read the `Date` column as calendar dates.
pub(crate) fn date_values(df: &DataFrame) -> Result<Vec<NaiveDate>, QuoteError> {
    let days = df.column(DATE)?.cast(&DataType::Int32)?;
    days.i32()?
        .into_iter()
        .map(|d| {
            d.and_then(days_to_date).ok_or_else(|| QuoteError::NullValue {
                column: DATE.to_string(),
            })
        })
        .collect()
}

/// Read a numeric column as `f64`; nulls become NaN.
pub(crate) fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<f64>, QuoteError> {
    let values = df.column(name)?.cast(&DataType::Float64)?;
    Ok(values
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

/// Read a numeric column as `u64`; nulls become 0.
pub(crate) fn u64_values(df: &DataFrame, name: &str) -> Result<Vec<u64>, QuoteError> {
    let values = df.column(name)?.cast(&DataType::UInt64)?;
    Ok(values.u64()?.into_iter().map(|v| v.unwrap_or(0)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_offset_matches_unix_epoch() {
        assert_eq!(date_to_days(NaiveDate::default()), 0);
        assert_eq!(days_to_date(0), Some(NaiveDate::default()));
        let d = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(days_to_date(date_to_days(d)), Some(d));
    }

    #[test]
    fn test_quote_frame_capital_gains_is_optional() {
        let row = RawQuoteRow {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
            adj_close: 1.0,
            volume: 10,
            dividends: 0.0,
            stock_splits: 0.0,
            capital_gains: None,
        };
        let without = quote_frame(&[row.clone()], false).unwrap();
        assert!(!without.schema().contains(CAPITAL_GAINS));

        let with = quote_frame(&[row], true).unwrap();
        let gains = f64_values(&with, CAPITAL_GAINS).unwrap();
        assert_eq!(gains, vec![0.0]);
    }

    #[test]
    fn test_date_values_roundtrip_through_frame() {
        let dates = vec![
            NaiveDate::from_ymd_opt(2023, 12, 29).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        ];
        let df = DataFrame::new(vec![date_series(DATE, &dates).unwrap().into()]).unwrap();
        assert_eq!(date_values(&df).unwrap(), dates);
    }
}
