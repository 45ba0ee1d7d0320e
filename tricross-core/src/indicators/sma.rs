//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a lookback window.
//! Lookback: period - 1 (first valid value at index period-1).

use super::indicator::{Indicator, IndicatorError, IndicatorSeries};

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn window(&self) -> usize {
        self.period
    }

    fn compute(&self, closes: &[f64]) -> Result<IndicatorSeries, IndicatorError> {
        if self.period == 0 {
            return Err(IndicatorError::ZeroWindow {
                name: self.name.clone(),
            });
        }
        let n = closes.len();
        if n < self.period {
            return Ok(IndicatorSeries::empty(&self.name, self.offset()));
        }

        let period = self.period as f64;
        let mut values = Vec::with_capacity(n - self.period + 1);
        let mut sum: f64 = closes[..self.period].iter().sum();
        values.push(sum / period);

        // Roll the window forward
        for i in self.period..n {
            sum = sum - closes[i - self.period] + closes[i];
            values.push(sum / period);
        }

        Ok(IndicatorSeries::new(&self.name, self.offset(), values))
    }
}
