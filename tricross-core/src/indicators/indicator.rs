//! Indicator trait and the offset-carrying series it produces.
//!
//! Indicators are pure functions: closing prices in, numeric series out.
//! A series holds only valid values; the `offset` records how many leading
//! bars were consumed as warm-up, so `values.len() + offset == bars`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while computing an indicator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("{name}: window must be >= 1")]
    ZeroWindow { name: String },

    #[error("{name}: regression window {window} has zero x-variance")]
    DegenerateWindow { name: String, window: usize },
}

/// Trait for indicators.
///
/// # Look-ahead contamination guard
/// No value at bar t may depend on a close from bar t+1 or later.
/// Every indicator must pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "lsma_25", "wma_9").
    fn name(&self) -> &str;

    /// Window length in bars.
    fn window(&self) -> usize;

    /// Leading bars consumed before the first value exists.
    fn offset(&self) -> usize {
        self.window().saturating_sub(1)
    }

    /// Compute the indicator over the full closing-price series.
    ///
    /// Returns `max(0, closes.len() - offset())` values.
    fn compute(&self, closes: &[f64]) -> Result<IndicatorSeries, IndicatorError>;
}

/// A computed indicator series paired with its warm-up offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub name: String,
    pub offset: usize,
    pub values: Vec<f64>,
}

impl IndicatorSeries {
    pub fn new(name: impl Into<String>, offset: usize, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            offset,
            values,
        }
    }

    /// An empty series for inputs shorter than the window.
    pub fn empty(name: impl Into<String>, offset: usize) -> Self {
        Self::new(name, offset, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at a local (series-relative) index.
    pub fn get_local(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Value at an absolute bar index, `None` inside the warm-up or past the end.
    pub fn value_at_bar(&self, bar_index: usize) -> Option<f64> {
        bar_index
            .checked_sub(self.offset)
            .and_then(|local| self.get_local(local))
    }

    /// `len() + offset`; equals the input length whenever the input covered the warm-up.
    pub fn bar_count(&self) -> usize {
        self.values.len() + self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_at_bar_respects_offset() {
        let s = IndicatorSeries::new("wma_3", 2, vec![10.0, 11.0, 12.0]);
        assert_eq!(s.value_at_bar(0), None);
        assert_eq!(s.value_at_bar(1), None);
        assert_eq!(s.value_at_bar(2), Some(10.0));
        assert_eq!(s.value_at_bar(4), Some(12.0));
        assert_eq!(s.value_at_bar(5), None); // out of bounds
        assert_eq!(s.bar_count(), 5);
    }

    #[test]
    fn empty_series() {
        let s = IndicatorSeries::empty("lsma_25", 24);
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
        assert_eq!(s.get_local(0), None);
    }
}
