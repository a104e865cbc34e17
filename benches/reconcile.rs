//! Benchmarks for reconciliation with varying candidate set sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use trazo::candidate::{inventory_total, CandidateSet};
use trazo::optimizer::{ModelStatus, OptimizerResult, OptimizerRoute, OptimizerSummary};
use trazo::reconcile::reconcile;

fn create_candidates(count: usize) -> CandidateSet {
    let values = (0..count)
        .map(|i| {
            json!({
                "ID_TRAZO": format!("R{:07}", i),
                "TDA_CVE": 100 + (i % 40),
                "MET_ENTREGA": if i % 2 == 0 { "FLOTA LIVERPOOL" } else { "MENSAJERIA EXTERNA" },
                "INVENTARIO_OH": 1 + (i % 9),
                "COSTO": 40.0 + (i % 13) as f64,
            })
        })
        .collect();
    CandidateSet::from_values(values, "ID_TRAZO").unwrap()
}

/// Every tenth candidate is selected.
fn create_result(count: usize) -> OptimizerResult {
    let routes = (0..count)
        .step_by(10)
        .map(|i| OptimizerRoute {
            route_key: format!("R{:07}", i),
            assigned_qty: 1,
            estimated_delivery_date: Some("2025-06-05".to_string()),
            lead_time_days: (i % 5) as i64 + 1,
            cost: 55.0,
            store_id: 100 + (i % 40) as i64,
        })
        .collect();
    let mut summary = OptimizerSummary::with_status(ModelStatus::Optimal);
    summary.max_lead_time_days = Some(5);
    OptimizerResult::new(routes, summary)
}

fn bench_reconcile_by_candidate_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");

    for count in [10, 100, 1_000, 10_000] {
        let candidates = create_candidates(count);
        let result = create_result(count);

        group.bench_with_input(BenchmarkId::new("candidates", count), &count, |b, _| {
            b.iter(|| {
                black_box(reconcile(Some(&candidates), Some(&result)).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_inventory_total(c: &mut Criterion) {
    let candidates = create_candidates(1_000);

    c.bench_function("inventory_total_1000_rows", |b| {
        b.iter(|| {
            black_box(inventory_total(&candidates, Some(108)));
        });
    });
}

criterion_group!(benches, bench_reconcile_by_candidate_count, bench_inventory_total);
criterion_main!(benches);
