//! The end-to-end computation: bars → smoothing → alignment → detection.
//!
//! Pure and synchronous. Each call allocates its own series and signal list
//! and shares no state with other calls, so identical inputs always produce
//! identical reports.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, InsufficientDataPolicy, PipelineConfig};
use crate::data::{BarSource, DataError, FetchRequest};
use crate::domain::{closes, validate_bars, Bar, BarError};
use crate::indicators::IndicatorError;

use super::align::align;
use super::detector::CrossoverDetector;
use super::report::{ReportSeries, ReportStatus, SignalReport};
use super::smoothing::smooth;

/// Errors surfaced by `run_pipeline`. Too few bars is not one of them.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("invalid bars: {0}")]
    InvalidBars(#[from] BarError),
}

/// Errors from `fetch_and_run`: either the bars never arrived or the pipeline failed.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Fetch bars once from `source` and run the pipeline over them.
///
/// The fetch is atomic: a source error aborts before any computation.
pub fn fetch_and_run(
    source: &dyn BarSource,
    request: &FetchRequest,
    config: &PipelineConfig,
) -> Result<(Vec<Bar>, SignalReport), RunError> {
    config.validate().map_err(PipelineError::from)?;
    let bars = source.fetch(request)?;
    debug!(
        source = source.name(),
        symbol = %request.symbol,
        interval = %request.interval,
        bars = bars.len(),
        "bars fetched"
    );
    let report = run_pipeline(&bars, config)?;
    Ok((bars, report))
}

/// Run the full signal pipeline over `bars` (oldest first).
///
/// Returns `ReportStatus::InsufficientData` with empty series when the bars
/// do not cover the longest window, unless the config asks to reject that case.
pub fn run_pipeline(bars: &[Bar], config: &PipelineConfig) -> Result<SignalReport, PipelineError> {
    config.validate()?;
    validate_bars(bars)?;

    if bars.len() < config.min_bars() {
        if config.insufficient_data == InsufficientDataPolicy::Reject {
            config.validate_for(bars.len())?;
        }
        warn!(
            bars = bars.len(),
            required = config.min_bars(),
            "insufficient data for configured windows"
        );
        return Ok(SignalReport::insufficient(config.max_offset()));
    }

    let smoothed = smooth(&closes(bars), config)?;
    let aligned = align(bars, &smoothed);
    debug!(
        max_offset = aligned.alignment().max_offset,
        aligned = aligned.len(),
        "series aligned"
    );

    let outcome = CrossoverDetector::new().detect(&aligned);
    info!(
        bars = bars.len(),
        signals = outcome.signals.len(),
        open_position = ?outcome.final_position,
        "pipeline complete"
    );

    Ok(SignalReport {
        series: ReportSeries::from_aligned(&aligned),
        signals: outcome.signals,
        open_position: outcome.final_position,
        status: ReportStatus::Complete,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PositionState, SignalKind};
    use crate::engine::test_bars;

    #[test]
    fn zero_window_fails_before_computation() {
        let bars = test_bars(&[1.0; 40]);
        let err = run_pipeline(&bars, &PipelineConfig::new(25, 9, 0)).unwrap_err();
        assert!(matches!(err, PipelineError::Config(ConfigError::ZeroWindow { .. })));
    }

    #[test]
    fn too_few_bars_is_empty_not_error() {
        let bars = test_bars(&[1.0; 10]);
        let report = run_pipeline(&bars, &PipelineConfig::default()).unwrap();
        assert!(report.is_insufficient());
        assert!(report.series.is_empty());
        assert!(report.signals.is_empty());
    }

    #[test]
    fn too_few_bars_rejected_under_strict_policy() {
        let bars = test_bars(&[1.0; 10]);
        let mut config = PipelineConfig::default();
        config.insufficient_data = InsufficientDataPolicy::Reject;
        let err = run_pipeline(&bars, &config).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Config(ConfigError::WindowExceedsBars { bars: 10, .. })
        ));
    }

    #[test]
    fn empty_bars_is_insufficient() {
        let report = run_pipeline(&[], &PipelineConfig::default()).unwrap();
        assert!(report.is_insufficient());
    }

    #[test]
    fn unordered_bars_rejected() {
        let mut bars = test_bars(&[1.0; 30]);
        bars.swap(3, 4);
        let err = run_pipeline(&bars, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidBars(_)));
    }

    #[test]
    fn exact_min_bars_gives_one_point() {
        let bars = test_bars(&(0..25).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
        let report = run_pipeline(&bars, &PipelineConfig::default()).unwrap();
        assert_eq!(report.status, ReportStatus::Complete);
        assert_eq!(report.series.len(), 1);
        assert_eq!(report.series.first_bar_index, 24);
        assert_eq!(report.series.timestamps[0], bars[24].timestamp);
    }

    #[test]
    fn fetch_and_run_propagates_unavailable_data() {
        use crate::data::StaticSource;
        let err = fetch_and_run(
            &StaticSource::default(),
            &FetchRequest::new("LTCBTC", "1h", 100),
            &PipelineConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, RunError::Data(DataError::Empty { .. })));
    }

    #[test]
    fn fetch_and_run_rejects_config_before_fetching() {
        use crate::data::StaticSource;
        let source = StaticSource::new(test_bars(&[1.0; 30]));
        let err = fetch_and_run(
            &source,
            &FetchRequest::new("LTCBTC", "1h", 100),
            &PipelineConfig::new(0, 9, 9),
        )
        .unwrap_err();
        assert!(matches!(err, RunError::Pipeline(PipelineError::Config(_))));
    }

    #[test]
    fn rise_fall_rise_trades_once() {
        // Closes rise by 5 for 10 bars, fall by 5 for 10, rise by 5 for 10.
        // With L=5, short=EMA(3), mid=WMA(3):
        //   bar 12 (close 130): short 133.75 > mid 133.33 > regression 132.0 → buy
        //   bar 22 (close 110): short 106.25 < mid 106.67 < regression 108.0 → sell
        let mut closes: Vec<f64> = (0..10).map(|k| 100.0 + 5.0 * k as f64).collect();
        closes.extend((1..=10).map(|k| 145.0 - 5.0 * k as f64));
        closes.extend((1..=10).map(|k| 95.0 + 5.0 * k as f64));
        let bars = test_bars(&closes);

        let report = run_pipeline(&bars, &PipelineConfig::new(5, 3, 3)).unwrap();
        assert_eq!(report.signals.len(), 2);
        assert_eq!(report.signals[0].kind, SignalKind::Buy);
        assert_eq!(report.signals[0].bar_index, 12);
        assert_eq!(report.signals[0].price, 130.0);
        assert_eq!(report.signals[1].kind, SignalKind::Sell);
        assert_eq!(report.signals[1].bar_index, 22);
        assert_eq!(report.signals[1].price, 110.0);
        assert_eq!(report.signals[1].timestamp, bars[22].timestamp);
        assert_eq!(report.open_position, PositionState::Flat);
    }
}
