//! Bar source trait and structured error types.
//!
//! The `BarSource` trait abstracts over where bars come from (Binance, a CSV
//! export, in-memory fixtures) so the pipeline never depends on transport.
//! A fetch is all-or-nothing: a source either returns the full bar array or
//! an error, never a partial array.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Bar, Symbol};

/// Every variant means the bars are unavailable for this request.
///
/// These are propagated to the caller unchanged; the pipeline never retries.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("data unavailable: network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("data unavailable: rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("data unavailable: provider rejected request ({code}): {message}")]
    Provider { code: i64, message: String },

    #[error("data unavailable: response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("data unavailable: no bars returned for {symbol}")]
    Empty { symbol: Symbol },

    #[error("data unavailable: invalid request: {0}")]
    InvalidRequest(String),

    #[error("data unavailable: failed to read {path}: {message}")]
    File { path: String, message: String },

    #[error("data unavailable: {0}")]
    Other(String),
}

impl DataError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DataError::NetworkUnreachable(_) | DataError::RateLimited { .. }
        )
    }
}

/// What to fetch: one instrument, one interval, the most recent `limit` bars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    pub symbol: Symbol,
    pub interval: String,
    pub limit: usize,
}

impl FetchRequest {
    pub fn new(symbol: impl Into<Symbol>, interval: impl Into<String>, limit: usize) -> Self {
        Self {
            symbol: symbol.into(),
            interval: interval.into(),
            limit,
        }
    }
}

impl From<&crate::config::SourceConfig> for FetchRequest {
    fn from(source: &crate::config::SourceConfig) -> Self {
        Self::new(source.symbol.clone(), source.interval.clone(), source.limit)
    }
}

/// Trait for bar sources.
///
/// Implementations return bars oldest first. An empty result is reported as
/// `DataError::Empty`, never as `Ok(vec![])`.
pub trait BarSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch up to `request.limit` of the most recent bars.
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<Bar>, DataError>;
}

/// Keep only the newest `limit` bars.
pub(crate) fn keep_latest(mut bars: Vec<Bar>, limit: usize) -> Vec<Bar> {
    if bars.len() > limit {
        bars.drain(..bars.len() - limit);
    }
    bars
}

/// In-memory bar source for tests, benches and replays.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    bars: Vec<Bar>,
}

impl StaticSource {
    pub fn new(bars: Vec<Bar>) -> Self {
        Self { bars }
    }
}

impl BarSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(&self, request: &FetchRequest) -> Result<Vec<Bar>, DataError> {
        let bars = keep_latest(self.bars.clone(), request.limit);
        if bars.is_empty() {
            return Err(DataError::Empty {
                symbol: request.symbol.clone(),
            });
        }
        Ok(bars)
    }
}
