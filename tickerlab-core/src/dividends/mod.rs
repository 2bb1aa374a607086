//! Dividend cadence inference and trailing yield.

pub mod analyzer;
pub mod history;

pub use analyzer::{DividendAnalyzer, YIELD_DECIMALS};
pub use history::{DividendError, DividendHistory, DividendRecord};
