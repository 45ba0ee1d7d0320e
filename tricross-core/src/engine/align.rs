//! Alignment layer — maps three differently-offset series onto one index.
//!
//! With offsets oL, oS, oM and `max_offset = max(oL, oS, oM)`, aligned index
//! `i` (0 ≤ i < N − max_offset) refers to absolute bar `max_offset + i` and to
//! local index `max_offset + i − o` in a series with offset `o`. Every aligned
//! index therefore has a value in all three series and the same bar behind it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Bar;
use crate::indicators::IndicatorSeries;

use super::smoothing::SmoothedSeries;

/// Index arithmetic shared by every aligned triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    pub max_offset: usize,
    pub len: usize,
}

impl Alignment {
    pub fn new(bar_count: usize, offsets: [usize; 3]) -> Self {
        let max_offset = offsets.into_iter().max().unwrap_or(0);
        Self {
            max_offset,
            len: bar_count.saturating_sub(max_offset),
        }
    }

    /// Absolute bar index behind aligned index `i`.
    pub fn bar_index(&self, i: usize) -> usize {
        self.max_offset + i
    }

    /// Local index into a series with warm-up `offset` for aligned index `i`.
    pub fn local_index(&self, i: usize, offset: usize) -> usize {
        self.bar_index(i) - offset
    }
}

/// The three indicator values at one aligned index, plus the bar behind them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignedTriple {
    pub index: usize,
    pub bar_index: usize,
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub regression: f64,
    pub short: f64,
    pub mid: f64,
}

/// The aligned view over a bar sequence, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeries {
    alignment: Alignment,
    triples: Vec<AlignedTriple>,
}

impl AlignedSeries {
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn triples(&self) -> &[AlignedTriple] {
        &self.triples
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}

/// Align the smoothed series against the bars they were computed from.
///
/// # Panics
/// If a series cannot supply a value for an aligned index. That can only
/// happen when a series' offset was computed incorrectly.
pub fn align(bars: &[Bar], smoothed: &SmoothedSeries) -> AlignedSeries {
    let alignment = Alignment::new(bars.len(), smoothed.offsets());

    let triples = (0..alignment.len)
        .map(|i| {
            let bar_index = alignment.bar_index(i);
            let bar = &bars[bar_index];
            AlignedTriple {
                index: i,
                bar_index,
                timestamp: bar.timestamp,
                close: bar.close,
                regression: lookup(&smoothed.regression, &alignment, i),
                short: lookup(&smoothed.short, &alignment, i),
                mid: lookup(&smoothed.mid, &alignment, i),
            }
        })
        .collect();

    AlignedSeries { alignment, triples }
}

fn lookup(series: &IndicatorSeries, alignment: &Alignment, i: usize) -> f64 {
    let local = alignment.local_index(i, series.offset);
    match series.get_local(local) {
        Some(value) => value,
        None => panic!(
            "alignment invariant violated: series '{}' (offset {}, len {}) has no value \
             at local index {local} for aligned index {i}",
            series.name,
            series.offset,
            series.len()
        ),
    }
}
