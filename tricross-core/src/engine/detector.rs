//! Crossover detector — a flat/long state machine over aligned triples.
//!
//! - Buy when `short > mid > regression` while flat.
//! - Sell when `short < mid < regression` while long.
//!
//! The scan is a single forward pass. A position still long at the end of
//! the scan is left open: no closing sell is synthesized, so a signal list
//! may legitimately end on a `Buy`.

use crate::domain::{PositionState, Signal, SignalKind};

use super::align::{AlignedSeries, AlignedTriple};

/// Which ordering, if any, the three values are in at this triple.
///
/// The two orderings are mutually exclusive; ties match neither.
pub fn crossover_kind(triple: &AlignedTriple) -> Option<SignalKind> {
    let AlignedTriple {
        regression,
        short,
        mid,
        ..
    } = *triple;

    if short > mid && mid > regression {
        Some(SignalKind::Buy)
    } else if short < mid && mid < regression {
        Some(SignalKind::Sell)
    } else {
        None
    }
}

/// Signals plus the position the scan ended in.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorOutcome {
    pub signals: Vec<Signal>,
    pub final_position: PositionState,
}

/// Single-position crossover state machine.
#[derive(Debug, Clone, Default)]
pub struct CrossoverDetector {
    position: PositionState,
}

impl CrossoverDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> PositionState {
        self.position
    }

    /// Advance by one aligned index. At most one transition fires.
    pub fn step(&mut self, triple: &AlignedTriple) -> Option<Signal> {
        let kind = match (crossover_kind(triple)?, self.position) {
            (SignalKind::Buy, PositionState::Flat) => {
                self.position = PositionState::Long;
                SignalKind::Buy
            }
            (SignalKind::Sell, PositionState::Long) => {
                self.position = PositionState::Flat;
                SignalKind::Sell
            }
            _ => return None,
        };

        Some(Signal {
            kind,
            price: triple.close,
            timestamp: triple.timestamp,
            bar_index: triple.bar_index,
        })
    }

    /// Scan every aligned index in chronological order.
    pub fn detect(mut self, aligned: &AlignedSeries) -> DetectorOutcome {
        let signals = aligned
            .triples()
            .iter()
            .filter_map(|t| self.step(t))
            .collect();

        DetectorOutcome {
            signals,
            final_position: self.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn triple(index: usize, regression: f64, short: f64, mid: f64) -> AlignedTriple {
        AlignedTriple {
            index,
            bar_index: index + 10,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
                + Duration::hours(index as i64),
            close: 100.0 + index as f64,
            regression,
            short,
            mid,
        }
    }

    #[test]
    fn orderings() {
        assert_eq!(crossover_kind(&triple(0, 1.0, 3.0, 2.0)), Some(SignalKind::Buy));
        assert_eq!(crossover_kind(&triple(0, 3.0, 1.0, 2.0)), Some(SignalKind::Sell));
        assert_eq!(crossover_kind(&triple(0, 2.0, 3.0, 1.0)), None);
        // Ties match neither ordering.
        assert_eq!(crossover_kind(&triple(0, 1.0, 2.0, 2.0)), None);
        assert_eq!(crossover_kind(&triple(0, 2.0, 2.0, 2.0)), None);
    }

    #[test]
    fn buy_fires_only_when_flat() {
        let mut det = CrossoverDetector::new();
        let sig = det.step(&triple(0, 1.0, 3.0, 2.0)).unwrap();
        assert_eq!(sig.kind, SignalKind::Buy);
        assert_eq!(sig.price, 100.0);
        assert_eq!(sig.bar_index, 10);
        assert_eq!(det.position(), PositionState::Long);

        // Same ordering again: already long, nothing fires.
        assert!(det.step(&triple(1, 1.0, 3.0, 2.0)).is_none());
        assert_eq!(det.position(), PositionState::Long);
    }

    #[test]
    fn sell_requires_long() {
        let mut det = CrossoverDetector::new();
        assert!(det.step(&triple(0, 3.0, 1.0, 2.0)).is_none());
        assert_eq!(det.position(), PositionState::Flat);
    }

    #[test]
    fn round_trip_and_trailing_long() {
        let mut det = CrossoverDetector::new();
        let kinds: Vec<SignalKind> = [
            triple(0, 1.0, 3.0, 2.0), // buy
            triple(1, 2.0, 2.5, 3.0), // no ordering
            triple(2, 3.0, 1.0, 2.0), // sell
            triple(3, 3.0, 1.0, 2.0), // flat already
            triple(4, 1.0, 3.0, 2.0), // buy, left open
        ]
        .iter()
        .filter_map(|t| det.step(t))
        .map(|s| s.kind)
        .collect();

        assert_eq!(kinds, vec![SignalKind::Buy, SignalKind::Sell, SignalKind::Buy]);
        assert_eq!(det.position(), PositionState::Long);
    }
}
