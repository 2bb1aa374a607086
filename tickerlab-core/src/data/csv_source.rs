//! CSV quote source.
//!
//! Reads `<dir>/<TICKER>.csv` files laid out the way common quote downloaders
//! export them. A `Capital Gains` header, when present, is carried through.

use super::frame::{quote_frame, RawQuoteRow};
use super::provider::{QuoteError, QuoteSource};
use super::schema::CAPITAL_GAINS;
use log::debug;
use polars::prelude::DataFrame;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Quote source backed by a directory of per-ticker CSV files.
#[derive(Debug, Clone)]
pub struct CsvQuoteSource {
    dir: PathBuf,
}

impl CsvQuoteSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the CSV file holding `ticker`.
    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{ticker}.csv"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Parse quote CSV text into a raw quote table.
pub fn read_quote_csv<R: Read>(reader: R) -> Result<DataFrame, QuoteError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let with_capital_gains = rdr.headers()?.iter().any(|h| h.trim() == CAPITAL_GAINS);

    let mut rows = Vec::new();
    for record in rdr.deserialize::<RawQuoteRow>() {
        rows.push(record?);
    }
    Ok(quote_frame(&rows, with_capital_gains)?)
}

impl QuoteSource for CsvQuoteSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self, ticker: &str) -> Result<DataFrame, QuoteError> {
        let path = self.path_for(ticker);
        if !path.is_file() {
            return Err(QuoteError::TickerNotFound {
                ticker: ticker.to_string(),
            });
        }
        debug!("reading {ticker} from {}", path.display());
        let file = std::fs::File::open(&path)?;
        read_quote_csv(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::frame::{date_values, f64_values};
    use chrono::NaiveDate;

    const STOCK_CSV: &str = "\
Date,Open,High,Low,Close,Adj Close,Volume,Dividends,Stock Splits
2024-02-08 00:00:00-05:00,50.1,50.9,49.8,50.5,50.2,120000,0.0,0.0
2024-02-09 00:00:00-05:00,50.5,51.2,50.1,51.0,50.7,98000,0.24,0.0
";

    const FUND_CSV: &str = "\
Date,Open,High,Low,Close,Adj Close,Volume,Dividends,Stock Splits,Capital Gains
2024-12-20,80.0,81.0,79.5,80.7,80.7,5000,0.0,0.0,0.0
2024-12-23,80.7,81.2,80.1,80.9,80.9,5100,0.0,0.0,1.12
";

    #[test]
    fn test_read_quote_csv_parses_timestamped_dates() {
        let df = read_quote_csv(STOCK_CSV.as_bytes()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(
            date_values(&df).unwrap()[1],
            NaiveDate::from_ymd_opt(2024, 2, 9).unwrap()
        );
        assert_eq!(f64_values(&df, "Dividends").unwrap(), vec![0.0, 0.24]);
        assert!(!df.schema().contains(CAPITAL_GAINS));
    }

    #[test]
    fn test_read_quote_csv_keeps_capital_gains_header() {
        let df = read_quote_csv(FUND_CSV.as_bytes()).unwrap();
        assert_eq!(f64_values(&df, CAPITAL_GAINS).unwrap(), vec![0.0, 1.12]);
    }

    #[test]
    fn test_read_quote_csv_rejects_missing_header() {
        let csv = "Date,Open,Close\n2024-01-02,1.0,1.0\n";
        assert!(matches!(
            read_quote_csv(csv.as_bytes()),
            Err(QuoteError::Csv(_))
        ));
    }

    #[test]
    fn test_fetch_unknown_ticker() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvQuoteSource::new(dir.path());
        let err = source.fetch("NOPE").unwrap_err();
        assert!(matches!(err, QuoteError::TickerNotFound { ref ticker } if ticker == "NOPE"));
    }

    #[test]
    fn test_fetch_reads_ticker_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("KO.csv"), STOCK_CSV).unwrap();
        let source = CsvQuoteSource::new(dir.path());
        let df = source.fetch("KO").unwrap();
        assert_eq!(df.height(), 2);
    }
}
