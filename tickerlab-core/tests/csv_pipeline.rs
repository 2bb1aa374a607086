//! Config-driven CSV source feeding the instrument pipeline.

use std::fmt::Write as _;
use tickerlab_core::config::ProviderKind;
use tickerlab_core::{Instrument, PaymentCadence, QuoteSourceConfig};

/// Three years of a semi-annual payer with a capital-gains column, as a downloader would export.
fn fund_csv() -> String {
    let mut out =
        String::from("Date,Open,High,Low,Close,Adj Close,Volume,Dividends,Stock Splits,Capital Gains\n");
    for year in 2022..2025 {
        for (month, dividend) in [(1, 0.0), (3, 0.0), (6, 0.45), (9, 0.0), (12, 0.45)] {
            let gains = if month == 12 { 0.8 } else { 0.0 };
            writeln!(
                out,
                "{year}-{month:02}-15 00:00:00-05:00,100.0,101.0,99.0,100.5,100.004,2500,{dividend},0.0,{gains}"
            )
            .unwrap();
        }
    }
    out
}

#[test]
fn csv_config_builds_dividend_etf() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("VBAL.csv"), fund_csv()).unwrap();

    let config_path = dir.path().join("tickerlab.toml");
    std::fs::write(
        &config_path,
        format!("provider = \"csv\"\ncsv_dir = {:?}\n", dir.path().to_string_lossy()),
    )
    .unwrap();

    let config = QuoteSourceConfig::load(&config_path).unwrap();
    assert_eq!(config.provider, ProviderKind::Csv);
    let source = config.build_source().unwrap();

    let inst = Instrument::dividend_etf(&source, "VBAL").unwrap();
    assert!(!inst.prices().schema().contains("Capital Gains"));

    let records = inst.price_records().unwrap();
    assert_eq!(records.len(), 15);
    assert_eq!(records[0].adj_close, 100.0);

    let history = inst.dividends().unwrap();
    assert_eq!(history.payment_count(), 6);
    assert_eq!(history.cadence().unwrap(), PaymentCadence::SemiAnnual);
    // Two payments of 0.45 over a 100.00 close
    assert_eq!(history.latest_yield(), Some(0.009));
}
