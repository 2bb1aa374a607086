//! TickerLab Core: ticker instruments, cleaned price frames, dividend cadence and yield.
//!
//! - Quote sources (Yahoo Finance, CSV, in-memory) returning raw daily quote tables
//! - Price frame builder: drops OHLC and split columns, rounds adjusted close
//! - Instrument profiles selecting a pipeline of named transformations
//! - Dividend analyzer: payment cadence from the median gap, trailing yield

pub mod config;
pub mod data;
pub mod dividends;
pub mod domain;
pub mod pipeline;

pub use config::{ConfigError, QuoteSourceConfig};
pub use data::{QuoteError, QuoteSource};
pub use dividends::{DividendError, DividendHistory, DividendRecord};
pub use domain::{
    AssetType, Instrument, InstrumentError, InstrumentProfile, PaymentCadence, PriceRecord,
};
