use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sales_dashboard::{render, DashboardConfig, FilterSelection, RenderRequest};
use sales_model::{Dataset, GeoTable, OrderRecord};
use std::time::Duration;

const REGIONS: [&str; 4] = ["Central", "East", "South", "West"];
const STATES: [&str; 8] = [
    "Texas",
    "Ohio",
    "New York",
    "California",
    "Florida",
    "Washington",
    "Puerto Rico",
    "Oregon",
];

fn bench_rows() -> usize {
    std::env::var("SALES_DASHBOARD_BENCH_ROWS")
        .ok()
        .and_then(|v| v.replace('_', "").parse::<usize>().ok())
        .filter(|&v| (1_000..=5_000_000).contains(&v))
        .unwrap_or(100_000)
}

fn build_dataset(rows: usize) -> Dataset {
    let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
    (0..rows)
        .map(|i| {
            OrderRecord::new(
                REGIONS[i % REGIONS.len()],
                STATES[(i / 3) % STATES.len()],
                format!("Product {}", i % 1_500),
                ((i * 37) % 2_000) as f64 + 0.99,
                ((i * 13) % 400) as f64 - 150.0,
                start + Days::new((i % 2_190) as u64),
            )
        })
        .collect()
}

fn bench_render(c: &mut Criterion) {
    let rows = bench_rows();
    let dataset = build_dataset(rows);
    let geo = GeoTable::us_states();
    let config = DashboardConfig::default();

    let everything = RenderRequest::default();
    let narrowed = RenderRequest::new(
        FilterSelection::all()
            .with_region("West")
            .with_dates(
                NaiveDate::from_ymd_opt(2017, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2018, 12, 31).unwrap(),
            ),
    );

    let mut group = c.benchmark_group("render");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(5));
    group.throughput(Throughput::Elements(rows as u64));

    group.bench_with_input(BenchmarkId::new("all", rows), &rows, |b, _| {
        b.iter(|| black_box(render(&dataset, &geo, &everything, &config)))
    });
    group.bench_with_input(BenchmarkId::new("region_and_dates", rows), &rows, |b, _| {
        b.iter(|| black_box(render(&dataset, &geo, &narrowed, &config)))
    });

    group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
