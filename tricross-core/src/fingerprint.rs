//! Content fingerprints for configurations and reports.
//!
//! - `ConfigHash`: identity of a `PipelineConfig` (windows, kinds, modes).
//! - `ReportDigest`: identity of a `SignalReport`'s canonical JSON.
//!
//! The pipeline is a pure function, so the same bars and config always yield
//! the same digest. BLAKE3 keeps hashes stable across builds and platforms.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::PipelineConfig;
use crate::engine::SignalReport;

/// BLAKE3 hash of a pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigHash(pub String);

impl ConfigHash {
    pub fn of(config: &PipelineConfig) -> Self {
        // Field order is fixed by the struct, so the JSON is canonical.
        let json = serde_json::to_string(config).expect("PipelineConfig must serialize");
        Self(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}

impl fmt::Display for ConfigHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// BLAKE3 hash of a report's canonical JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportDigest(pub String);

impl ReportDigest {
    pub fn of(report: &SignalReport) -> Self {
        let json = report.to_canonical_json();
        Self(blake3::hash(json.as_bytes()).to_hex().to_string())
    }

    /// First 12 hex characters, for log lines.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for ReportDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
