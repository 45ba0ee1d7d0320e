//! Output contract handed to the presentation layer.
//!
//! `series` holds the three aligned lines with one timestamp per point so
//! callers can zip `signals` against it by timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{PositionState, Signal};

use super::align::AlignedSeries;

/// Whether the bars covered the indicator warm-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Complete,
    /// Fewer bars than the longest window: empty series, no signals.
    InsufficientData,
}

/// The three aligned indicator lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSeries {
    /// Absolute bar index of the first point (the largest warm-up offset).
    pub first_bar_index: usize,
    pub timestamps: Vec<DateTime<Utc>>,
    pub regression: Vec<f64>,
    pub short: Vec<f64>,
    pub mid: Vec<f64>,
}

impl ReportSeries {
    pub fn from_aligned(aligned: &AlignedSeries) -> Self {
        let triples = aligned.triples();
        Self {
            first_bar_index: aligned.alignment().max_offset,
            timestamps: triples.iter().map(|t| t.timestamp).collect(),
            regression: triples.iter().map(|t| t.regression).collect(),
            short: triples.iter().map(|t| t.short).collect(),
            mid: triples.iter().map(|t| t.mid).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Pipeline result: aligned series plus the signals derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalReport {
    pub series: ReportSeries,
    pub signals: Vec<Signal>,
    /// `Long` when the last buy has no matching sell yet.
    pub open_position: PositionState,
    pub status: ReportStatus,
}

impl SignalReport {
    /// The empty-but-valid result for too few bars.
    pub fn insufficient(first_bar_index: usize) -> Self {
        Self {
            series: ReportSeries {
                first_bar_index,
                ..ReportSeries::default()
            },
            signals: Vec::new(),
            open_position: PositionState::Flat,
            status: ReportStatus::InsufficientData,
        }
    }

    pub fn is_insufficient(&self) -> bool {
        self.status == ReportStatus::InsufficientData
    }

    /// Canonical JSON encoding; identical reports encode to identical bytes.
    pub fn to_canonical_json(&self) -> String {
        serde_json::to_string(self).expect("SignalReport must serialize")
    }
}
