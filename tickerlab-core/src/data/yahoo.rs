//! Yahoo Finance quote source.
//!
//! Fetches full daily history from Yahoo's v8 chart API, including dividend,
//! split and capital-gains events, and lays it out as a raw quote table.
//! Handles retries with exponential backoff and response parsing.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.
//! The CSV source is the fallback when Yahoo is unavailable.

use super::frame::{quote_frame, RawQuoteRow};
use super::provider::{QuoteError, QuoteSource};
use crate::config::YahooConfig;
use chrono::NaiveDate;
use log::{debug, warn};
use polars::prelude::DataFrame;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    events: Option<ChartEvents>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "instrumentType")]
    instrument_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartEvents {
    #[serde(default)]
    dividends: HashMap<String, CashEvent>,
    #[serde(default)]
    splits: HashMap<String, SplitEvent>,
    #[serde(default, rename = "capitalGains")]
    capital_gains: HashMap<String, CashEvent>,
}

#[derive(Debug, Deserialize)]
struct CashEvent {
    amount: f64,
    date: i64,
}

#[derive(Debug, Deserialize)]
struct SplitEvent {
    date: i64,
    numerator: f64,
    denominator: f64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Instrument types Yahoo reports capital-gains distributions for.
const FUND_TYPES: [&str; 2] = ["ETF", "MUTUALFUND"];

/// Rows parsed out of a chart response.
#[derive(Debug)]
struct ParsedChart {
    rows: Vec<RawQuoteRow>,
    with_capital_gains: bool,
}

/// Yahoo Finance quote source.
pub struct YahooQuoteSource {
    client: reqwest::blocking::Client,
    config: YahooConfig,
}

impl YahooQuoteSource {
    pub fn new(config: YahooConfig) -> Result<Self, QuoteError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| QuoteError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Build the chart API URL for a ticker.
    ///
    /// Without a configured start date the full history (`range=max`) is requested.
    fn chart_url(&self, ticker: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let window = match self.config.start {
            Some(start) => {
                let end = self
                    .config
                    .end
                    .unwrap_or_else(|| chrono::Utc::now().date_naive());
                format!(
                    "period1={}&period2={}",
                    day_start_ts(start),
                    day_start_ts(end) + 86_399
                )
            }
            None => "range=max".to_string(),
        };
        format!(
            "{base}/v8/finance/chart/{ticker}\
             ?{window}&interval=1d&includeAdjustedClose=true\
             &events=div%2Csplits%2CcapitalGains"
        )
    }

    /// Parse the chart API response into raw quote rows.
    fn parse_response(ticker: &str, resp: ChartResponse) -> Result<ParsedChart, QuoteError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    QuoteError::TickerNotFound {
                        ticker: ticker.to_string(),
                    }
                } else {
                    QuoteError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
            } else {
                QuoteError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| QuoteError::ResponseFormatChanged("result array is empty".into()))?;

        let timestamps = data
            .timestamp
            .ok_or_else(|| QuoteError::ResponseFormatChanged("no timestamps".into()))?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| QuoteError::ResponseFormatChanged("no quote data".into()))?;

        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let events = data.events.unwrap_or_default();
        let dividends = cash_by_date(&events.dividends)?;
        let gains = cash_by_date(&events.capital_gains)?;
        let mut splits = HashMap::new();
        for split in events.splits.values() {
            if split.denominator != 0.0 {
                splits.insert(ts_to_date(split.date)?, split.numerator / split.denominator);
            }
        }

        let is_fund = data
            .meta
            .and_then(|m| m.instrument_type)
            .is_some_and(|t| FUND_TYPES.contains(&t.as_str()));
        let with_capital_gains = is_fund || !gains.is_empty();

        let mut rows = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = ts_to_date(ts)?;

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();
            let volume = quote.volume.get(i).copied().flatten();
            let adj_close = adj_closes
                .as_ref()
                .and_then(|v| v.get(i).copied().flatten());

            // Skip rows where all OHLCV are None (holidays/non-trading days)
            if open.is_none()
                && high.is_none()
                && low.is_none()
                && close.is_none()
                && volume.is_none()
            {
                continue;
            }

            rows.push(RawQuoteRow {
                date,
                open: open.unwrap_or(f64::NAN),
                high: high.unwrap_or(f64::NAN),
                low: low.unwrap_or(f64::NAN),
                close: close.unwrap_or(f64::NAN),
                adj_close: adj_close.or(close).unwrap_or(f64::NAN),
                volume: volume.unwrap_or(0),
                dividends: dividends.get(&date).copied().unwrap_or(0.0),
                stock_splits: splits.get(&date).copied().unwrap_or(0.0),
                capital_gains: with_capital_gains
                    .then(|| gains.get(&date).copied().unwrap_or(0.0)),
            });
        }

        if rows.is_empty() {
            return Err(QuoteError::TickerNotFound {
                ticker: ticker.to_string(),
            });
        }

        Ok(ParsedChart {
            rows,
            with_capital_gains,
        })
    }

    /// Execute the chart request with retry logic.
    fn fetch_with_retry(&self, ticker: &str) -> Result<ParsedChart, QuoteError> {
        let url = self.chart_url(ticker);
        let base_delay = Duration::from_millis(self.config.base_delay_ms);
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = base_delay * 2u32.pow(attempt - 1);
                warn!("retrying {ticker} in {delay:?} (attempt {attempt})");
                std::thread::sleep(delay);
            }

            debug!("GET {url}");
            match self.client.get(&url).send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(60);
                        last_error = Some(QuoteError::RateLimited {
                            retry_after_secs: retry_after,
                        });
                        continue;
                    }

                    if status == reqwest::StatusCode::UNAUTHORIZED
                        || status == reqwest::StatusCode::FORBIDDEN
                    {
                        return Err(QuoteError::AuthenticationRequired(format!(
                            "Yahoo Finance refused the request (HTTP {status})"
                        )));
                    }

                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(QuoteError::TickerNotFound {
                            ticker: ticker.to_string(),
                        });
                    }

                    if !status.is_success() {
                        last_error = Some(QuoteError::Other(format!("HTTP {status} for {ticker}")));
                        if status.is_server_error() {
                            continue;
                        }
                        break;
                    }

                    let chart: ChartResponse = resp.json().map_err(|e| {
                        QuoteError::ResponseFormatChanged(format!(
                            "failed to parse response for {ticker}: {e}"
                        ))
                    })?;

                    return Self::parse_response(ticker, chart);
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        last_error = Some(QuoteError::NetworkUnreachable(e.to_string()));
                        continue;
                    }
                    return Err(QuoteError::NetworkUnreachable(e.to_string()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| QuoteError::Other("max retries exceeded".into())))
    }
}

impl QuoteSource for YahooQuoteSource {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(&self, ticker: &str) -> Result<DataFrame, QuoteError> {
        let parsed = self.fetch_with_retry(ticker)?;
        debug!(
            "{ticker}: {} rows from Yahoo (capital gains column: {})",
            parsed.rows.len(),
            parsed.with_capital_gains
        );
        Ok(quote_frame(&parsed.rows, parsed.with_capital_gains)?)
    }
}

fn day_start_ts(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp()
}

fn ts_to_date(ts: i64) -> Result<NaiveDate, QuoteError> {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| QuoteError::ResponseFormatChanged(format!("invalid timestamp: {ts}")))
}

fn cash_by_date(events: &HashMap<String, CashEvent>) -> Result<HashMap<NaiveDate, f64>, QuoteError> {
    let mut by_date = HashMap::with_capacity(events.len());
    for event in events.values() {
        *by_date.entry(ts_to_date(event.date)?).or_insert(0.0) += event.amount;
    }
    Ok(by_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-03-14, 2024-03-15, 2024-03-18 at 13:30 UTC
    const CHART_JSON: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"instrumentType": "ETF"},
                "timestamp": [1710423000, 1710509400, 1710768600],
                "events": {
                    "dividends": {"1710509400": {"amount": 0.35, "date": 1710509400}},
                    "splits": {"1710768600": {"date": 1710768600, "numerator": 2, "denominator": 1, "splitRatio": "2:1"}}
                },
                "indicators": {
                    "quote": [{
                        "open": [10.0, 10.5, null],
                        "high": [11.0, 11.5, null],
                        "low": [9.5, 10.0, null],
                        "close": [10.8, 11.0, null],
                        "volume": [1000, 2000, null]
                    }],
                    "adjclose": [{"adjclose": [10.7, 10.9, null]}]
                }
            }],
            "error": null
        }
    }"#;

    fn parse(json: &str) -> Result<ParsedChart, QuoteError> {
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        YahooQuoteSource::parse_response("VTI", resp)
    }

    #[test]
    fn test_parse_maps_events_onto_rows() {
        let parsed = parse(CHART_JSON).unwrap();

        // Third bar is all-null and skipped
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].date, NaiveDate::from_ymd_opt(2024, 3, 14).unwrap());
        assert_eq!(parsed.rows[0].dividends, 0.0);
        assert_eq!(parsed.rows[1].dividends, 0.35);
        assert_eq!(parsed.rows[1].adj_close, 10.9);
        assert_eq!(parsed.rows[1].volume, 2000);
    }

    #[test]
    fn test_parse_emits_capital_gains_for_funds() {
        let parsed = parse(CHART_JSON).unwrap();
        assert!(parsed.with_capital_gains);
        assert_eq!(parsed.rows[0].capital_gains, Some(0.0));
    }

    #[test]
    fn test_parse_equity_has_no_capital_gains() {
        let json = CHART_JSON.replace("\"ETF\"", "\"EQUITY\"");
        let parsed = parse(&json).unwrap();
        assert!(!parsed.with_capital_gains);
        assert!(parsed.rows.iter().all(|r| r.capital_gains.is_none()));
    }

    #[test]
    fn test_parse_not_found_error() {
        let json = r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}}"#;
        let err = parse(json).unwrap_err();
        assert!(matches!(err, QuoteError::TickerNotFound { ref ticker } if ticker == "VTI"));
    }

    #[test]
    fn test_parse_missing_timestamps_is_format_change() {
        let json = r#"{"chart": {"result": [{"indicators": {"quote": []}}], "error": null}}"#;
        let err = parse(json).unwrap_err();
        assert!(matches!(err, QuoteError::ResponseFormatChanged(_)));
    }

    #[test]
    fn test_chart_url_uses_full_range_without_start() {
        let source = YahooQuoteSource::new(YahooConfig::default()).unwrap();
        let url = source.chart_url("SCHD");
        assert!(url.contains("/v8/finance/chart/SCHD?range=max"));
        assert!(url.contains("events=div%2Csplits%2CcapitalGains"));
    }

    #[test]
    fn test_chart_url_uses_period_with_start() {
        let config = YahooConfig {
            start: NaiveDate::from_ymd_opt(2024, 1, 1),
            end: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..YahooConfig::default()
        };
        let source = YahooQuoteSource::new(config).unwrap();
        let url = source.chart_url("SCHD");
        assert!(url.contains("period1=1704067200&period2=1704153599"));
    }
}
