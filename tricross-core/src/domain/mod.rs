//! Domain types for tricross

pub mod bar;
pub mod position;
pub mod signal;

pub use bar::{closes, validate_bars, Bar, BarError};
pub use position::PositionState;
pub use signal::{is_alternating, Signal, SignalKind};

/// Symbol type alias
pub type Symbol = String;
