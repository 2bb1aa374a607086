//! Domain types: price records, payment cadence, instrument profiles, instruments

pub mod cadence;
pub mod instrument;
pub mod price;
pub mod profile;

pub use cadence::PaymentCadence;
pub use instrument::{Instrument, InstrumentError};
pub use price::PriceRecord;
pub use profile::{AssetType, InstrumentProfile};
