use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One cleaned daily price row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: NaiveDate,
    /// Adjusted close, rounded to cents.
    pub adj_close: f64,
    pub volume: u64,
    /// Dividend paid on this date, 0.0 when none.
    pub dividends: f64,
}

impl PriceRecord {
    pub fn pays_dividend(&self) -> bool {
        self.dividends > 0.0
    }
}
