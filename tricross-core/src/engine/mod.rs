//! Signal engine — smoothing, alignment and crossover detection.
//!
//! Data flows one way:
//!
//! 1. Smoothing: closes → regression, short and mid series (each with its own offset)
//! 2. Alignment: the three series → one index over bars that have all three values
//! 3. Detection: aligned triples → buy/sell signals via a flat/long state machine

pub mod align;
pub mod detector;
pub mod pipeline;
pub mod report;
pub mod smoothing;

pub use align::{align, AlignedSeries, AlignedTriple, Alignment};
pub use detector::{crossover_kind, CrossoverDetector, DetectorOutcome};
pub use pipeline::{fetch_and_run, run_pipeline, PipelineError, RunError};
pub use report::{ReportSeries, ReportStatus, SignalReport};
pub use smoothing::{smooth, SmoothedSeries};

/// Create hourly bars from close prices for testing.
///
/// open = prev_close (or close for the first bar), high/low = ±1 around
/// open/close, volume = 1000.
#[cfg(test)]
pub fn test_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use chrono::{Duration, TimeZone, Utc};
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            crate::domain::Bar {
                timestamp: start + Duration::hours(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}
