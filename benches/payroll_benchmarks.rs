//! Performance benchmarks for the Payroll Engine.
//!
//! Covers the pure pay formulas, batch eligibility, one reconciliation pass
//! over many rows, finalizing a batch, and listing a page of drafts over HTTP.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::hint::black_box;
use std::sync::Arc;

use axum::{body::Body, http::Request};
use chrono::{Duration, NaiveDate, NaiveTime};
use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rust_decimal::Decimal;
use tower::ServiceExt;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::calculation::{AttendanceReconciler, PayInputs, compute_breakdown};
use payroll_engine::config::{ConfigLoader, ReconciliationConfig};
use payroll_engine::finalization::FinalizationGate;
use payroll_engine::models::{AttendanceEntry, OfficialTime, PayrollDraftRow, PayrollStatus};
use payroll_engine::selection::{FinalizedIndex, selectable_rows};
use payroll_engine::store::{InMemoryStore, SeedData};

const EMPLOYEES: usize = 50;

fn period_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn create_rows(count: usize) -> Vec<PayrollDraftRow> {
    (0..count)
        .map(|i| PayrollDraftRow {
            id: format!("row_{:05}", i),
            employee_number: format!("EMP-{:03}", i % EMPLOYEES),
            department: if i % 2 == 0 { "Finance" } else { "Operations" }.to_string(),
            start_date: Some(period_start()),
            end_date: Some(period_start() + Duration::days(14 + (i / EMPLOYEES) as i64)),
            rate_per_day: Some(Decimal::from(750)),
            rh: Some(Decimal::from(80)),
            deduction_hours: Some(Decimal::from(2)),
            deduction_minutes: Some(Decimal::from(15)),
            sss_contribution: Some(Decimal::from(100)),
            status: PayrollStatus::Unprocessed,
        })
        .collect()
}

/// Seeds ten working days of attendance and an official time per employee.
fn create_store(rows: Vec<PayrollDraftRow>) -> InMemoryStore {
    let mut seed = SeedData {
        drafts: rows,
        ..Default::default()
    };
    for e in 0..EMPLOYEES {
        let employee_number = format!("EMP-{:03}", e);
        let entries = (1..=10)
            .map(|d| AttendanceEntry {
                date: period_start() + Duration::days(d),
                time_in: NaiveTime::from_hms_opt(8, 0, 0),
                time_out: NaiveTime::from_hms_opt(17, 0, 0),
            })
            .collect();
        seed.attendance.insert(employee_number.clone(), entries);
        seed.official_times.insert(
            employee_number,
            OfficialTime {
                days_covered: "Mon-Fri".to_string(),
                number_of_days: 5,
                time_range: "08:00-17:00".to_string(),
            },
        );
    }
    InMemoryStore::from_seed(seed)
}

/// Benchmark: Pure pay computation for one row.
fn bench_compute(c: &mut Criterion) {
    let inputs = PayInputs {
        rate_per_day: Decimal::from(750),
        rh: Decimal::from(12),
        deduction_hours: Decimal::from(2),
        deduction_minutes: Decimal::from(15),
        sss_contribution: Decimal::from(100),
    };

    c.bench_function("compute_breakdown", |b| {
        b.iter(|| black_box(compute_breakdown(black_box(&inputs))))
    });
}

/// Benchmark: Eligibility over 1000 rows with half of them finalized.
fn bench_selectable_rows(c: &mut Criterion) {
    let rows = create_rows(1000);
    let index: FinalizedIndex = rows
        .iter()
        .step_by(2)
        .filter_map(|row| row.identity().ok())
        .collect();

    c.bench_function("selectable_rows_1000", |b| {
        b.iter(|| black_box(selectable_rows(black_box(&rows), &index)))
    });
}

/// Benchmark: One reconciliation pass at increasing row counts.
fn bench_reconcile_rows(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let settings = ReconciliationConfig::default();

    let mut group = c.benchmark_group("reconcile_rows");

    for row_count in [10usize, 100, 1000].iter() {
        let rows = create_rows(*row_count);
        let store = create_store(rows.clone());

        group.throughput(Throughput::Elements(*row_count as u64));
        group.bench_with_input(BenchmarkId::new("rows", row_count), row_count, |b, _| {
            b.to_async(&rt).iter(|| async {
                let reconciler = AttendanceReconciler::new(&store, &store, &settings);
                black_box(reconciler.reconcile_rows(&rows).await)
            })
        });
    }

    group.finish();
}

/// Benchmark: Finalizing a batch of 100 rows into an empty store.
fn bench_export_batch(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let rows = create_rows(100);

    c.bench_function("export_batch_100", |b| {
        b.to_async(&rt).iter_batched(
            || Arc::new(create_store(rows.clone())),
            |store| {
                let rows = &rows;
                async move {
                    let gate = FinalizationGate::new(store.clone(), store);
                    black_box(gate.export_batch(rows).await.unwrap())
                }
            },
            BatchSize::SmallInput,
        )
    });
}

/// Benchmark: Listing one page of 1000 drafts over HTTP.
fn bench_list_drafts(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let config = ConfigLoader::load("./config/payroll").expect("Failed to load config");
    let state = AppState::new(config, Arc::new(create_store(create_rows(1000))));
    let router = create_router(state);

    c.bench_function("list_drafts_page", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .uri("/drafts?page=2&page_size=25")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

criterion_group!(
    benches,
    bench_compute,
    bench_selectable_rows,
    bench_reconcile_rows,
    bench_export_batch,
    bench_list_drafts,
);
criterion_main!(benches);
