//! Least Squares Moving Average (LSMA), a.k.a. linear regression smoother.
//!
//! For each window of `L` closes ending at bar k, fit y = slope·x + intercept
//! over x = 0..L-1 and report the fitted value at the newest point:
//!
//! ```text
//! slope     = (L·Σxy − Σx·Σy) / (L·Σx² − (Σx)²)
//! intercept = (Σy − slope·Σx) / L
//! value     = slope·(L−1) + intercept
//! ```
//!
//! Lookback: L - 1.

use serde::{Deserialize, Serialize};

use super::indicator::{Indicator, IndicatorError, IndicatorSeries};

/// How window sums are maintained across bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegressionMode {
    /// Recompute Σy and Σxy from scratch for every window. O(N·L).
    #[default]
    PerWindow,
    /// Slide Σy and Σxy forward in O(1) per bar. O(N).
    Incremental,
}

#[derive(Debug, Clone)]
pub struct LinearRegression {
    window: usize,
    mode: RegressionMode,
    name: String,
}

impl LinearRegression {
    pub fn new(window: usize) -> Self {
        Self::with_mode(window, RegressionMode::PerWindow)
    }

    pub fn with_mode(window: usize, mode: RegressionMode) -> Self {
        Self {
            window,
            mode,
            name: format!("lsma_{window}"),
        }
    }

    pub fn mode(&self) -> RegressionMode {
        self.mode
    }

    /// Σx, Σx² and the slope denominator for x = 0..L-1.
    fn x_moments(&self) -> Result<XMoments, IndicatorError> {
        if self.window == 0 {
            return Err(IndicatorError::ZeroWindow {
                name: self.name.clone(),
            });
        }
        let l = self.window as f64;
        let sum_x: f64 = (0..self.window).map(|x| x as f64).sum();
        let sum_x2: f64 = (0..self.window).map(|x| (x * x) as f64).sum();
        let denominator = l * sum_x2 - sum_x * sum_x;
        if denominator == 0.0 {
            return Err(IndicatorError::DegenerateWindow {
                name: self.name.clone(),
                window: self.window,
            });
        }
        Ok(XMoments {
            sum_x,
            denominator,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct XMoments {
    sum_x: f64,
    denominator: f64,
}

impl XMoments {
    fn fitted_last(&self, window: usize, sum_y: f64, sum_xy: f64) -> f64 {
        let l = window as f64;
        let slope = (l * sum_xy - self.sum_x * sum_y) / self.denominator;
        let intercept = (sum_y - slope * self.sum_x) / l;
        slope * (l - 1.0) + intercept
    }
}

impl Indicator for LinearRegression {
    fn name(&self) -> &str {
        &self.name
    }

    fn window(&self) -> usize {
        self.window
    }

    fn compute(&self, closes: &[f64]) -> Result<IndicatorSeries, IndicatorError> {
        let moments = self.x_moments()?;
        let n = closes.len();
        let w = self.window;

        if n < w {
            return Ok(IndicatorSeries::empty(&self.name, self.offset()));
        }

        let values = match self.mode {
            RegressionMode::PerWindow => closes
                .windows(w)
                .map(|y| {
                    let sum_y: f64 = y.iter().sum();
                    let sum_xy: f64 = y.iter().enumerate().map(|(x, v)| x as f64 * v).sum();
                    moments.fitted_last(w, sum_y, sum_xy)
                })
                .collect(),
            RegressionMode::Incremental => {
                let mut values = Vec::with_capacity(n - w + 1);
                let mut sum_y: f64 = closes[..w].iter().sum();
                let mut sum_xy: f64 = closes[..w]
                    .iter()
                    .enumerate()
                    .map(|(x, v)| x as f64 * v)
                    .sum();
                values.push(moments.fitted_last(w, sum_y, sum_xy));

                // Shifting the window left by one lowers every x by 1, so
                // Σxy loses Σy (old window), and the entering close lands at x = L-1.
                for k in w..n {
                    let leaving = closes[k - w];
                    let entering = closes[k];
                    sum_xy = sum_xy - (sum_y - leaving) + (w as f64 - 1.0) * entering;
                    sum_y = sum_y - leaving + entering;
                    values.push(moments.fitted_last(w, sum_y, sum_xy));
                }
                values
            }
        };

        Ok(IndicatorSeries::new(&self.name, self.offset(), values))
    }
}
