//! Bar sources: Binance klines, CSV files and in-memory fixtures.

pub mod binance;
pub mod csv_source;
pub mod provider;

pub use binance::BinanceSource;
pub use csv_source::{read_bars, CsvSource};
pub use provider::{BarSource, DataError, FetchRequest, StaticSource};
