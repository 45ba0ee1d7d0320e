//! Concrete indicator implementations — the smoothing engine's building blocks.
//!
//! Every indicator consumes the closing-price series and returns an
//! `IndicatorSeries` holding only valid values plus its warm-up offset.
//! The regression smoother (`LinearRegression`) drives the slow line; the
//! short and mid lines are chosen per slot through `AverageKind`.

pub mod ema;
pub mod indicator;
pub mod lsma;
pub mod sma;
pub mod wma;

use serde::{Deserialize, Serialize};

pub use ema::Ema;
pub use indicator::{Indicator, IndicatorError, IndicatorSeries};
pub use lsma::{LinearRegression, RegressionMode};
pub use sma::Sma;
pub use wma::Wma;

/// Moving-average family used for the short and mid indicator slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AverageKind {
    Exponential,
    Weighted,
    Simple,
}

impl AverageKind {
    /// Build the moving average of this kind over `window` bars.
    pub fn build(&self, window: usize) -> Box<dyn Indicator> {
        match self {
            AverageKind::Exponential => Box::new(Ema::new(window)),
            AverageKind::Weighted => Box::new(Wma::new(window)),
            AverageKind::Simple => Box::new(Sma::new(window)),
        }
    }
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
