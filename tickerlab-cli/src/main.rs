//! TickerLab entry point.
//!
//! Instruments are built through the `tickerlab-core` library; the binary
//! only sets up logging and exits.

use anyhow::Result;
use log::debug;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    debug!("tickerlab {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
