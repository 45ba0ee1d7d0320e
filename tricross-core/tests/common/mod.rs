//! Shared bar fixtures for integration tests.

#![allow(dead_code)]

use chrono::{Duration, TimeZone, Utc};
use tricross_core::domain::Bar;

/// Hourly bars with the given closes, starting 2024-01-02T00:00:00Z.
pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: start + Duration::hours(i as i64),
                open,
                high: open.max(close) + 0.5,
                low: open.min(close) - 0.5,
                close,
                volume: 1000.0 + i as f64,
            }
        })
        .collect()
}

/// N bars of a deterministic pseudo-random walk with realistic variation.
pub fn walk_bars(n: usize) -> Vec<Bar> {
    let mut price = 100.0_f64;
    let closes: Vec<f64> = (0..n)
        .map(|i| {
            // Simple LCG keeps the walk reproducible without an RNG dependency.
            let seed = (i as u64)
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let change = ((seed >> 33) % 200) as f64 / 100.0 - 1.0; // -1.0 to +0.99
            price = (price + change).max(10.0);
            price
        })
        .collect();
    bars_from_closes(&closes)
}
