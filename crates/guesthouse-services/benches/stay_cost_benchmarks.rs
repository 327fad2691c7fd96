//! Benchmarks for stay pricing
//!
//! Run with: cargo bench --package guesthouse-services

use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::America::Sao_Paulo;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use guesthouse_core::models::{RateTable, Stay};
use guesthouse_services::StayCostCalculator;

fn monday_afternoon() -> DateTime<Utc> {
    Sao_Paulo
        .with_ymd_and_hms(2024, 1, 8, 14, 0, 0)
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

/// Benchmark a typical weekend stay
fn bench_short_stay(c: &mut Criterion) {
    let calculator = StayCostCalculator::default();
    let entry = monday_afternoon() + Duration::days(4);
    let stay = Stay::new(entry, entry + Duration::hours(67), true);

    c.bench_function("short_stay_total", |b| {
        b.iter(|| calculator.compute_total(black_box(&stay)).unwrap());
    });
}

/// Benchmark stays of growing length
fn bench_stay_length(c: &mut Criterion) {
    let calculator = StayCostCalculator::default();
    let mut group = c.benchmark_group("stay_length");

    for nights in [1_i64, 7, 30, 365].iter() {
        let entry = monday_afternoon();
        let stay = Stay::new(entry, entry + Duration::days(*nights) + Duration::hours(4), false);

        group.throughput(Throughput::Elements(*nights as u64));
        group.bench_with_input(BenchmarkId::from_parameter(nights), nights, |b, _| {
            b.iter(|| calculator.quote(black_box(&stay)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark pricing a batch of check-ins, as a guest history listing does
fn bench_batch_pricing(c: &mut Criterion) {
    let calculator = StayCostCalculator::default();
    let rates = RateTable::default();
    let mut group = c.benchmark_group("batch_pricing");

    for size in [100, 1_000, 10_000].iter() {
        let stays: Vec<Stay> = (0..*size)
            .map(|i: i64| {
                let entry = monday_afternoon() + Duration::hours(i % 500);
                Stay::new(entry, entry + Duration::hours(20 + i % 100), i % 3 == 0)
            })
            .collect();

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                black_box(&stays)
                    .iter()
                    .filter_map(|s| calculator.compute_total_with(s, &rates).ok())
                    .sum::<rust_decimal::Decimal>()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_short_stay, bench_stay_length, bench_batch_pricing);
criterion_main!(benches);
