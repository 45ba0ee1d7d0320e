//! Smoothing engine — computes the three indicator lines from closing prices.
//!
//! All three series are computed once, up front, before alignment. Each is
//! shorter than the input by its own warm-up offset.

use tracing::debug;

use crate::config::PipelineConfig;
use crate::indicators::{Indicator, IndicatorError, IndicatorSeries};

/// The regression, short and mid lines for one bar sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedSeries {
    pub regression: IndicatorSeries,
    pub short: IndicatorSeries,
    pub mid: IndicatorSeries,
}

impl SmoothedSeries {
    pub fn offsets(&self) -> [usize; 3] {
        [self.regression.offset, self.short.offset, self.mid.offset]
    }
}

/// Compute the three series for `closes` under `config`.
pub fn smooth(closes: &[f64], config: &PipelineConfig) -> Result<SmoothedSeries, IndicatorError> {
    let regression = config.regression();
    let short = config.short_kind.build(config.short_window);
    let mid = config.mid_kind.build(config.mid_window);

    let smoothed = SmoothedSeries {
        regression: compute_one(&regression, closes)?,
        short: compute_one(short.as_ref(), closes)?,
        mid: compute_one(mid.as_ref(), closes)?,
    };

    debug!(
        bars = closes.len(),
        regression = smoothed.regression.len(),
        short = smoothed.short.len(),
        mid = smoothed.mid.len(),
        "smoothing complete"
    );

    Ok(smoothed)
}

fn compute_one(indicator: &dyn Indicator, closes: &[f64]) -> Result<IndicatorSeries, IndicatorError> {
    let series = indicator.compute(closes)?;
    debug_assert!(
        closes.len() < indicator.window() || series.len() + series.offset == closes.len(),
        "indicator '{}' produced {} values with offset {} for {} closes",
        indicator.name(),
        series.len(),
        series.offset,
        closes.len()
    );
    Ok(series)
}
