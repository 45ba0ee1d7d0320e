//! Criterion benchmarks for the signal pipeline hot paths.
//!
//! Benchmarks:
//! 1. Regression smoothing (per-window vs incremental)
//! 2. Moving averages (EMA, WMA, SMA)
//! 3. Full pipeline (smooth → align → detect)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tricross_core::domain::Bar;
use tricross_core::indicators::{Ema, Indicator, LinearRegression, RegressionMode, Sma, Wma};
use tricross_core::{run_pipeline, PipelineConfig};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + (i as f64 * 0.1).sin() * 10.0 + (i as f64 * 0.013).cos() * 4.0)
        .collect()
}

fn make_bars(n: usize) -> Vec<Bar> {
    let start = chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    let closes = make_closes(n);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: start + chrono::Duration::hours(i as i64),
                open,
                high: open.max(close) + 0.5,
                low: open.min(close) - 0.5,
                close,
                volume: 1_000.0,
            }
        })
        .collect()
}

// ── 1. Regression smoothing ──────────────────────────────────────────

fn bench_regression(c: &mut Criterion) {
    let mut group = c.benchmark_group("regression");

    for &bar_count in &[1_000usize, 10_000] {
        let closes = make_closes(bar_count);
        for (label, mode) in [
            ("per_window", RegressionMode::PerWindow),
            ("incremental", RegressionMode::Incremental),
        ] {
            let lsma = LinearRegression::with_mode(25, mode);
            group.bench_with_input(BenchmarkId::new(label, bar_count), &bar_count, |b, _| {
                b.iter(|| lsma.compute(black_box(&closes)))
            });
        }
    }

    group.finish();
}

// ── 2. Moving averages ───────────────────────────────────────────────

fn bench_averages(c: &mut Criterion) {
    let mut group = c.benchmark_group("moving_averages");
    let closes = make_closes(10_000);

    let averages: Vec<Box<dyn Indicator>> = vec![
        Box::new(Ema::new(9)),
        Box::new(Wma::new(9)),
        Box::new(Sma::new(9)),
    ];
    for avg in &averages {
        group.bench_function(avg.name(), |b| b.iter(|| avg.compute(black_box(&closes))));
    }

    group.finish();
}

// ── 3. Full pipeline ─────────────────────────────────────────────────

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let config = PipelineConfig::default();

    for &bar_count in &[1_000usize, 10_000] {
        let bars = make_bars(bar_count);
        group.bench_with_input(
            BenchmarkId::new("default_windows", bar_count),
            &bar_count,
            |b, _| b.iter(|| run_pipeline(black_box(&bars), black_box(&config))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_regression, bench_averages, bench_pipeline);
criterion_main!(benches);
