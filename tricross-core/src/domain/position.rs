use serde::{Deserialize, Serialize};

/// Position state of the crossover detector.
///
/// The detector holds at most one long position; there is no short side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionState {
    #[default]
    Flat,
    Long,
}

impl PositionState {
    pub fn is_long(&self) -> bool {
        matches!(self, Self::Long)
    }

    pub fn is_flat(&self) -> bool {
        matches!(self, Self::Flat)
    }
}
