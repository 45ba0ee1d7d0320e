//! Bar — the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OHLCV bar for one instrument over one fixed interval.
///
/// Bars are produced by a `BarSource` oldest first and never mutated afterwards.
/// Volume is fractional because exchange feeds report base-asset quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Returns true if any OHLCV field is NaN (void bar).
    pub fn is_void(&self) -> bool {
        self.open.is_nan()
            || self.high.is_nan()
            || self.low.is_nan()
            || self.close.is_nan()
            || self.volume.is_nan()
    }

    /// Basic OHLCV sanity check: high >= low, high >= open, high >= close, etc.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
            && self.volume >= 0.0
    }
}

/// Violations of the bar-sequence contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("bar {index} is out of order: {timestamp} is not after {previous}")]
    OutOfOrder {
        index: usize,
        timestamp: DateTime<Utc>,
        previous: DateTime<Utc>,
    },

    #[error("bar {index} has a non-finite close ({close})")]
    NonFiniteClose { index: usize, close: f64 },
}

/// Check that bars are strictly ascending by timestamp and carry finite closes.
///
/// Only the close feeds the indicators, so a NaN open or high is tolerated here.
pub fn validate_bars(bars: &[Bar]) -> Result<(), BarError> {
    for (index, bar) in bars.iter().enumerate() {
        if !bar.close.is_finite() {
            return Err(BarError::NonFiniteClose {
                index,
                close: bar.close,
            });
        }
        if index > 0 {
            let previous = bars[index - 1].timestamp;
            if bar.timestamp <= previous {
                return Err(BarError::OutOfOrder {
                    index,
                    timestamp: bar.timestamp,
                    previous,
                });
            }
        }
    }
    Ok(())
}

/// Extract the closing-price series the indicators consume.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sample_bar() -> Bar {
        Bar {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
            volume: 50_000.0,
        }
    }

    fn hourly(closes: &[f64]) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                timestamp: start + Duration::hours(i as i64),
                close,
                ..sample_bar()
            })
            .collect()
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar().is_sane());
    }

    #[test]
    fn bar_detects_void() {
        let mut bar = sample_bar();
        bar.open = f64::NAN;
        assert!(bar.is_void());
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_detects_insane_high_low() {
        let mut bar = sample_bar();
        bar.high = 97.0; // below low
        assert!(!bar.is_sane());
    }

    #[test]
    fn validate_accepts_ascending_bars() {
        assert_eq!(validate_bars(&hourly(&[1.0, 2.0, 3.0])), Ok(()));
        assert_eq!(validate_bars(&[]), Ok(()));
    }

    #[test]
    fn validate_rejects_duplicate_timestamp() {
        let mut bars = hourly(&[1.0, 2.0, 3.0]);
        bars[2].timestamp = bars[1].timestamp;
        assert!(matches!(
            validate_bars(&bars),
            Err(BarError::OutOfOrder { index: 2, .. })
        ));
    }

    #[test]
    fn validate_rejects_nan_close() {
        let bars = hourly(&[1.0, f64::NAN, 3.0]);
        assert!(matches!(
            validate_bars(&bars),
            Err(BarError::NonFiniteClose { index: 1, .. })
        ));
    }

    #[test]
    fn closes_preserves_order() {
        assert_eq!(closes(&hourly(&[3.0, 1.0, 2.0])), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = sample_bar();
        let json = serde_json::to_string(&bar).unwrap();
        let deser: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, deser);
    }
}
