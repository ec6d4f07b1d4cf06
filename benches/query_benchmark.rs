// Query benchmarks
// Author: Gabriel Demetrios Lafis

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use taxi_trip_analytics::{
    data::{Dataset, TripRecord},
    processing::{QuerySpec, TripQuery, TripService},
};

/// Generate `num_rows` trips spread over January 2024
fn create_dataset(num_rows: usize) -> Arc<Dataset> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid base timestamp");

    (0..num_rows)
        .map(|i| {
            let i = i as i64;
            let pickup = base + Duration::seconds((i * 97) % (31 * 24 * 3600));
            TripRecord {
                vendor_id: Some(1 + i % 2),
                pickup_datetime: Some(pickup),
                dropoff_datetime: Some(pickup + Duration::minutes(5 + i % 40)),
                passenger_count: Some(1 + i % 4),
                trip_distance: Some((i % 25) as f64 * 0.7),
                pu_location_id: Some(1 + i % 263),
                do_location_id: Some(1 + (i * 7) % 263),
                payment_type: Some(1 + i % 4),
                fare_amount: Some(5.0 + (i % 60) as f64),
                tip_amount: Some((i % 12) as f64),
                total_amount: Some(8.0 + (i % 75) as f64),
                congestion_surcharge: Some(if i % 3 == 0 { 2.5 } else { 0.0 }),
                airport_fee: Some(if i % 20 == 0 { 1.75 } else { 0.0 }),
            }
        })
        .collect::<Dataset>()
        .into()
}

fn bench_weekly_trips(c: &mut Criterion) {
    let mut group = c.benchmark_group("weekly_trips");

    for size in [1_000, 10_000, 100_000] {
        let service = TripService::new(create_dataset(size));
        let spec = QuerySpec::new(
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .expect("valid start"),
            NaiveDate::from_ymd_opt(2024, 1, 31)
                .and_then(|d| d.and_hms_opt(23, 59, 59))
                .expect("valid end"),
        );
        let query = TripQuery::WeeklyTrips(spec);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &query, |b, query| {
            b.iter(|| service.execute(black_box(query)).expect("query failed"))
        });
    }

    group.finish();
}

fn bench_aggregations(c: &mut Criterion) {
    let service = TripService::new(create_dataset(100_000));
    let mut group = c.benchmark_group("aggregations");

    let queries = [
        TripQuery::RevenueByVendor,
        TripQuery::PeakHours,
        TripQuery::PaymentSplit,
        TripQuery::AvgDurationVendor,
        TripQuery::TopPickupLocations { top: 10 },
        TripQuery::LongestTrips { top: 10 },
    ];

    for query in &queries {
        group.bench_function(query.name(), |b| {
            b.iter(|| service.execute(black_box(query)).expect("query failed"))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_weekly_trips, bench_aggregations);
criterion_main!(benches);
