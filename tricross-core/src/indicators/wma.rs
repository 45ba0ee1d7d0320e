//! Linearly Weighted Moving Average (WMA).
//!
//! Weights 1..W across the window, newest close weighted W, normalized by W(W+1)/2.
//! Lookback: period - 1.

use super::indicator::{Indicator, IndicatorError, IndicatorSeries};

#[derive(Debug, Clone)]
pub struct Wma {
    period: usize,
    name: String,
}

impl Wma {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            name: format!("wma_{period}"),
        }
    }
}

impl Indicator for Wma {
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
        let w = self.period;
        if n < w {
            return Ok(IndicatorSeries::empty(&self.name, self.offset()));
        }

        let denominator = (w * (w + 1)) as f64 / 2.0;
        let values = closes
            .windows(w)
            .map(|window| {
                let weighted: f64 = window
                    .iter()
                    .enumerate()
                    .map(|(j, v)| (j + 1) as f64 * v)
                    .sum();
                weighted / denominator
            })
            .collect();

        Ok(IndicatorSeries::new(&self.name, self.offset(), values))
    }
}
