//! Binance spot klines source.
//!
//! Fetches OHLCV bars from `GET /api/v3/klines`. Handles rate limiting,
//! retries with exponential backoff and response parsing. Retry logic lives
//! here, in the source; the pipeline sees either the full array or an error.

use std::time::Duration;

use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::provider::{keep_latest, BarSource, DataError, FetchRequest};
use crate::domain::Bar;

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Binance caps a single klines request at 1000 bars.
pub const MAX_LIMIT: usize = 1000;

const INTERVALS: &[&str] = &[
    "1s", "1m", "3m", "5m", "15m", "30m", "1h", "2h", "4h", "6h", "8h", "12h", "1d", "3d", "1w",
    "1M",
];

/// Error body Binance returns with 4xx statuses.
#[derive(Debug, Deserialize)]
struct ApiError {
    code: i64,
    msg: String,
}

/// Binance klines source over a blocking HTTP client.
pub struct BinanceSource {
    client: reqwest::blocking::Client,
    base_url: String,
    max_retries: u32,
    base_delay: Duration,
}

impl BinanceSource {
    pub fn new() -> Result<Self, DataError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        })
    }

    pub fn with_retries(mut self, max_retries: u32, base_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.base_delay = base_delay;
        self
    }

    fn klines_url(&self) -> String {
        format!("{}/api/v3/klines", self.base_url.trim_end_matches('/'))
    }

    /// Check symbol, interval and limit before touching the network.
    pub fn validate_request(request: &FetchRequest) -> Result<(), DataError> {
        if request.symbol.is_empty() || !request.symbol.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(DataError::InvalidRequest(format!(
                "symbol '{}' must be non-empty ASCII alphanumeric",
                request.symbol
            )));
        }
        if !INTERVALS.contains(&request.interval.as_str()) {
            return Err(DataError::InvalidRequest(format!(
                "unsupported interval '{}'",
                request.interval
            )));
        }
        if request.limit == 0 || request.limit > MAX_LIMIT {
            return Err(DataError::InvalidRequest(format!(
                "limit {} outside 1..={MAX_LIMIT}",
                request.limit
            )));
        }
        Ok(())
    }

    /// Parse a klines response body into bars, oldest first.
    ///
    /// Each row is `[openTime, "open", "high", "low", "close", "volume", closeTime, ...]`
    /// with prices encoded as decimal strings. The bar timestamp is the open time.
    pub fn parse_klines(symbol: &str, body: &str) -> Result<Vec<Bar>, DataError> {
        let rows: Vec<Vec<Value>> = serde_json::from_str(body).map_err(|e| {
            DataError::ResponseFormatChanged(format!("klines for {symbol} are not an array of rows: {e}"))
        })?;

        let mut bars = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            if row.len() < 6 {
                return Err(DataError::ResponseFormatChanged(format!(
                    "kline row {i} has {} fields, expected at least 6",
                    row.len()
                )));
            }
            let open_time = row[0].as_i64().ok_or_else(|| {
                DataError::ResponseFormatChanged(format!("kline row {i}: open time is not an integer"))
            })?;
            let timestamp = DateTime::from_timestamp_millis(open_time).ok_or_else(|| {
                DataError::ResponseFormatChanged(format!("kline row {i}: invalid timestamp {open_time}"))
            })?;

            bars.push(Bar {
                timestamp,
                open: decimal_field(&row[1], i, "open")?,
                high: decimal_field(&row[2], i, "high")?,
                low: decimal_field(&row[3], i, "low")?,
                close: decimal_field(&row[4], i, "close")?,
                volume: decimal_field(&row[5], i, "volume")?,
            });
        }

        if bars.is_empty() {
            return Err(DataError::Empty {
                symbol: symbol.to_string(),
            });
        }

        Ok(bars)
    }

    /// Execute a single request with retry logic.
    fn fetch_with_retry(&self, request: &FetchRequest) -> Result<Vec<Bar>, DataError> {
        let url = self.klines_url();
        let limit = request.limit.to_string();
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                warn!(
                    symbol = %request.symbol,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "retrying klines request"
                );
                std::thread::sleep(delay);
            }

            let response = self
                .client
                .get(&url)
                .query(&[
                    ("symbol", request.symbol.as_str()),
                    ("interval", request.interval.as_str()),
                    ("limit", limit.as_str()),
                ])
                .send();

            match response {
                Ok(resp) => {
                    let status = resp.status();

                    // 418: the IP is already banned; retrying only extends the ban.
                    if status == reqwest::StatusCode::IM_A_TEAPOT {
                        return Err(DataError::RateLimited {
                            retry_after_secs: retry_after(&resp),
                        });
                    }

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(DataError::RateLimited {
                            retry_after_secs: retry_after(&resp),
                        });
                        continue;
                    }

                    let body = resp
                        .text()
                        .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

                    if status.is_client_error() {
                        return Err(match serde_json::from_str::<ApiError>(&body) {
                            Ok(api) => DataError::Provider {
                                code: api.code,
                                message: api.msg,
                            },
                            Err(_) => DataError::Other(format!(
                                "HTTP {status} for {}",
                                request.symbol
                            )),
                        });
                    }

                    if !status.is_success() {
                        last_error = Some(DataError::NetworkUnreachable(format!(
                            "HTTP {status} for {}",
                            request.symbol
                        )));
                        continue;
                    }

                    let bars = Self::parse_klines(&request.symbol, &body)?;
                    debug!(symbol = %request.symbol, bars = bars.len(), "klines fetched");
                    return Ok(bars);
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                        continue;
                    }
                    return Err(DataError::NetworkUnreachable(e.to_string()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }
}

fn retry_after(resp: &reqwest::blocking::Response) -> u64 {
    resp.headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}

fn decimal_field(value: &Value, row: usize, field: &str) -> Result<f64, DataError> {
    let parsed = match value {
        Value::String(s) => s.parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        DataError::ResponseFormatChanged(format!("kline row {row}: {field} is not a decimal ({value})"))
    })
}

impl BarSource for BinanceSource {
    fn name(&self) -> &str {
        "binance"
    }

    fn fetch(&self, request: &FetchRequest) -> Result<Vec<Bar>, DataError> {
        Self::validate_request(request)?;
        let bars = self.fetch_with_retry(request)?;
        Ok(keep_latest(bars, request.limit))
    }
}
