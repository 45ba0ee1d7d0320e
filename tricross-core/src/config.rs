//! Serializable pipeline and source configuration.
//!
//! Configuration is passed into the pipeline at call time; nothing here is
//! process-global. Files are TOML with two tables:
//!
//! ```toml
//! [pipeline]
//! regression_window = 25
//! short_window = 9
//! mid_window = 9
//!
//! [source]
//! symbol = "LTCBTC"
//! interval = "1h"
//! limit = 1000
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::indicators::{AverageKind, LinearRegression, RegressionMode};

pub const DEFAULT_REGRESSION_WINDOW: usize = 25;
pub const DEFAULT_SHORT_WINDOW: usize = 9;
pub const DEFAULT_MID_WINDOW: usize = 9;

/// Configuration errors. Always raised before any series is computed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be >= 1")]
    ZeroWindow { field: &'static str },

    #[error("regression_window {window} leaves the least-squares fit undefined (need >= 2)")]
    DegenerateRegression { window: usize },

    #[error("{field} = {window} exceeds the {bars} available bars")]
    WindowExceedsBars {
        field: &'static str,
        window: usize,
        bars: usize,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// What the pipeline does when a window is longer than the bar series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsufficientDataPolicy {
    /// Return the empty-but-valid report flagged `InsufficientData`.
    #[default]
    Empty,
    /// Fail with `ConfigError::WindowExceedsBars`.
    Reject,
}

/// Window lengths and indicator choices for the three smoothed lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    #[serde(alias = "regressionWindow")]
    pub regression_window: usize,
    #[serde(alias = "shortWindow")]
    pub short_window: usize,
    #[serde(alias = "midWindow")]
    pub mid_window: usize,
    #[serde(alias = "shortKind")]
    pub short_kind: AverageKind,
    #[serde(alias = "midKind")]
    pub mid_kind: AverageKind,
    #[serde(alias = "regressionMode")]
    pub regression_mode: RegressionMode,
    #[serde(alias = "insufficientData")]
    pub insufficient_data: InsufficientDataPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            regression_window: DEFAULT_REGRESSION_WINDOW,
            short_window: DEFAULT_SHORT_WINDOW,
            mid_window: DEFAULT_MID_WINDOW,
            short_kind: AverageKind::Exponential,
            mid_kind: AverageKind::Weighted,
            regression_mode: RegressionMode::PerWindow,
            insufficient_data: InsufficientDataPolicy::Empty,
        }
    }
}

impl PipelineConfig {
    pub fn new(regression_window: usize, short_window: usize, mid_window: usize) -> Self {
        Self {
            regression_window,
            short_window,
            mid_window,
            ..Self::default()
        }
    }

    fn windows(&self) -> [(&'static str, usize); 3] {
        [
            ("regression_window", self.regression_window),
            ("short_window", self.short_window),
            ("mid_window", self.mid_window),
        ]
    }

    /// Check window parameters independent of the bar count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, window) in self.windows() {
            if window == 0 {
                return Err(ConfigError::ZeroWindow { field });
            }
        }
        if self.regression_window < 2 {
            return Err(ConfigError::DegenerateRegression {
                window: self.regression_window,
            });
        }
        Ok(())
    }

    /// Strict check: every window must fit inside `bars`.
    pub fn validate_for(&self, bars: usize) -> Result<(), ConfigError> {
        self.validate()?;
        for (field, window) in self.windows() {
            if window > bars {
                return Err(ConfigError::WindowExceedsBars {
                    field,
                    window,
                    bars,
                });
            }
        }
        Ok(())
    }

    /// Largest warm-up offset across the three indicators.
    pub fn max_offset(&self) -> usize {
        self.windows()
            .iter()
            .map(|(_, w)| w.saturating_sub(1))
            .max()
            .unwrap_or(0)
    }

    /// Minimum number of bars that yields at least one aligned index.
    pub fn min_bars(&self) -> usize {
        self.max_offset() + 1
    }

    pub fn regression(&self) -> LinearRegression {
        LinearRegression::with_mode(self.regression_window, self.regression_mode)
    }
}

/// Bar-source request defaults: symbol, interval and bar count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub symbol: String,
    pub interval: String,
    pub limit: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            symbol: "LTCBTC".into(),
            interval: "1h".into(),
            limit: 1000,
        }
    }
}

/// Top-level config file: `[pipeline]` and `[source]` tables.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
}

impl Config {
    /// Parse and validate a TOML config string.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.pipeline.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
