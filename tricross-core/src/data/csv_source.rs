//! CSV bar source for offline runs and replays.
//!
//! Expected header: `timestamp,open,high,low,close,volume`. The timestamp is
//! either RFC 3339 (`2024-01-02T00:00:00Z`) or integer epoch milliseconds.
//! A file holds one instrument; the request's symbol and interval are
//! informational only.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use super::provider::{keep_latest, BarSource, DataError, FetchRequest};
use crate::domain::Bar;

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(millis) = raw.parse::<i64>() {
        return DateTime::from_timestamp_millis(millis);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Read bars from any CSV reader, in file order.
pub fn read_bars<R: Read>(reader: R) -> Result<Vec<Bar>, DataError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut bars = Vec::new();

    for (line, record) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = record.map_err(|e| DataError::ResponseFormatChanged(format!("csv row {line}: {e}")))?;
        let timestamp = parse_timestamp(&row.timestamp).ok_or_else(|| {
            DataError::ResponseFormatChanged(format!(
                "csv row {line}: unrecognized timestamp '{}'",
                row.timestamp
            ))
        })?;
        bars.push(Bar {
            timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }

    Ok(bars)
}

/// Bar source backed by a single CSV file.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BarSource for CsvSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self, request: &FetchRequest) -> Result<Vec<Bar>, DataError> {
        let file = std::fs::File::open(&self.path).map_err(|e| DataError::File {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;
        let bars = keep_latest(read_bars(file)?, request.limit);
        if bars.is_empty() {
            return Err(DataError::Empty {
                symbol: request.symbol.clone(),
            });
        }
        debug!(path = %self.path.display(), bars = bars.len(), "csv bars loaded");
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
timestamp,open,high,low,close,volume
2024-01-02T00:00:00Z,100,101,99,100.5,10
1704157200000,100.5,102,100,101.5,12.5
2024-01-02T02:00:00+00:00,101.5,103,101,102.0,8
";

    #[test]
    fn reads_mixed_timestamp_formats() {
        let bars = read_bars(SAMPLE.as_bytes()).unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].close, 100.5);
        assert_eq!(bars[1].volume, 12.5);
        // 1704157200000 ms = 2024-01-02T01:00:00Z
        assert_eq!(bars[1].timestamp.to_rfc3339(), "2024-01-02T01:00:00+00:00");
        assert!(bars[1].timestamp < bars[2].timestamp);
    }

    #[test]
    fn bad_timestamp_is_format_change() {
        let csv = "timestamp,open,high,low,close,volume\nyesterday,1,1,1,1,1\n";
        let err = read_bars(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::ResponseFormatChanged(_)));
    }

    #[test]
    fn missing_column_is_format_change() {
        let csv = "timestamp,open,high,low,close\n2024-01-02T00:00:00Z,1,1,1,1\n";
        assert!(read_bars(csv.as_bytes()).is_err());
    }

    #[test]
    fn file_source_honors_limit() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let source = CsvSource::new(file.path());
        let bars = source.fetch(&FetchRequest::new("LTCBTC", "1h", 2)).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 101.5);
    }

    #[test]
    fn header_only_file_is_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"timestamp,open,high,low,close,volume\n").unwrap();
        let err = CsvSource::new(file.path())
            .fetch(&FetchRequest::new("LTCBTC", "1h", 10))
            .unwrap_err();
        assert!(matches!(err, DataError::Empty { .. }));
    }

    #[test]
    fn missing_file_is_file_error() {
        let err = CsvSource::new("/nonexistent/bars.csv")
            .fetch(&FetchRequest::new("LTCBTC", "1h", 10))
            .unwrap_err();
        assert!(matches!(err, DataError::File { .. }));
    }
}
