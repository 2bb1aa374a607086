//! Quote sources, quote table layout, and the price frame builder

pub mod canonicalize;
pub mod csv_source;
pub mod frame;
pub mod memory;
pub mod price_frame;
pub mod provider;
pub mod schema;
pub mod yahoo;

pub use canonicalize::Canonicalizer;
pub use csv_source::CsvQuoteSource;
pub use frame::{quote_frame, RawQuoteRow};
pub use memory::InMemorySource;
pub use price_frame::{build_price_frame, price_records, round_adj_close};
pub use provider::{QuoteError, QuoteSource};
pub use schema::QuoteSchema;
pub use yahoo::YahooQuoteSource;
