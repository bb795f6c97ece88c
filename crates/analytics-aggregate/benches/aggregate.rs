//! Benchmarks for window aggregation.

use analytics_aggregate::{AnalyticsReport, ChartSeries, MetricSchema, WindowSummary};
use analytics_core::types::{rolling_window, CallDayMetrics, DayRecord, RecordOrigin};
use chrono::{NaiveDate, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn generate_window(days: u32) -> (NaiveDate, Vec<DayRecord>) {
    let today = NaiveDate::from_ymd_opt(2025, 10, 9).unwrap();
    let records = rolling_window(today, days)
        .into_iter()
        .enumerate()
        .map(|(i, date)| {
            let i = i as u64;
            let metrics = CallDayMetrics {
                total_calls: 40 + i % 7,
                inbound_calls: 35 + i % 5,
                outbound_calls: 5 + i % 2,
                answered_calls: 30 + i % 4,
                unanswered_calls: 5 + i % 3,
                callbacks: i % 3,
                voicemails: i % 2,
                total_duration_secs: 7200 + i * 13,
            };
            DayRecord::new(date, metrics.to_payload(), RecordOrigin::Cached)
        })
        .collect();
    (today, records)
}

fn benchmark_summary(c: &mut Criterion) {
    let mut group = c.benchmark_group("WindowSummary");
    let schema = MetricSchema::calls();

    for days in [5u32, 30, 365].iter() {
        let (_, records) = generate_window(*days);

        group.bench_with_input(BenchmarkId::new("compute", days), &records, |b, records| {
            b.iter(|| WindowSummary::compute(black_box(records), black_box(&schema)))
        });
    }

    group.finish();
}

fn benchmark_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("ChartSeries");
    let schema = MetricSchema::calls();

    for days in [5u32, 30, 365].iter() {
        let (today, records) = generate_window(*days);

        group.bench_with_input(BenchmarkId::new("build", days), &records, |b, records| {
            b.iter(|| ChartSeries::build(black_box(records), black_box(&schema), today))
        });
    }

    group.finish();
}

fn benchmark_report(c: &mut Criterion) {
    let schema = MetricSchema::calls();
    let (today, records) = generate_window(30);
    let now = Utc::now();

    c.bench_function("AnalyticsReport/build_30d", |b| {
        b.iter(|| AnalyticsReport::build(&schema, black_box(records.clone()), today, now))
    });
}

criterion_group!(benches, benchmark_summary, benchmark_series, benchmark_report);
criterion_main!(benches);
