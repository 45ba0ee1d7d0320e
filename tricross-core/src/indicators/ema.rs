//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1]
//! Seed: EMA[period-1] = SMA of first `period` close values.
//! Lookback: period - 1.

use super::indicator::{Indicator, IndicatorError, IndicatorSeries};

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }

    pub fn alpha(&self) -> f64 {
        2.0 / (self.period as f64 + 1.0)
    }
}

impl Indicator for Ema {
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

        let alpha = self.alpha();
        let seed = closes[..self.period].iter().sum::<f64>() / self.period as f64;

        let mut values = Vec::with_capacity(n - self.period + 1);
        values.push(seed);
        let mut prev = seed;
        for &close in &closes[self.period..] {
            let ema = alpha * close + (1.0 - alpha) * prev;
            values.push(ema);
            prev = ema;
        }

        Ok(IndicatorSeries::new(&self.name, self.offset(), values))
    }
}
