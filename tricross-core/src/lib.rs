//! tricross core — three-line crossover signals from OHLCV bars.
//!
//! This crate contains the whole computation:
//! - Domain types (bars, signals, position state)
//! - Indicators: least-squares regression (LSMA) and WMA/EMA/SMA smoothers
//! - Alignment of differently warmed-up series onto one bar index
//! - A flat/long crossover detector emitting alternating buy/sell signals
//! - Bar sources (Binance klines, CSV, in-memory) behind one trait
//!
//! The pipeline is pure and synchronous; see `engine::run_pipeline`.

pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod fingerprint;
pub mod indicators;

pub use config::{Config, ConfigError, InsufficientDataPolicy, PipelineConfig, SourceConfig};
pub use engine::{fetch_and_run, run_pipeline, PipelineError, RunError, SignalReport};
