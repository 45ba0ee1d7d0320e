//! Buy/sell events emitted by the crossover detector.
//!
//! Signals are immutable once emitted. A signal list alternates strictly
//! between `Buy` and `Sell`, starting with `Buy`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Buy,
    Sell,
}

impl SignalKind {
    /// The kind that must follow this one in a well-formed signal list.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

/// A buy or sell event at the close of a specific bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    #[serde(rename = "type")]
    pub kind: SignalKind,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
    /// Absolute index of the emitting bar in the input sequence.
    pub bar_index: usize,
}

/// True if the list starts with `Buy` and never repeats a kind back to back.
pub fn is_alternating(signals: &[Signal]) -> bool {
    let mut expected = SignalKind::Buy;
    for signal in signals {
        if signal.kind != expected {
            return false;
        }
        expected = expected.opposite();
    }
    true
}
