use ballet_core::core::AppState;
use ballet_core::domain::{BranchFilter, TransactionKind};
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 20).expect("valid date")
}

fn bench_generation(c: &mut Criterion) {
    c.bench_function("generate_school", |b| {
        b.iter(|| {
            let state = AppState::generate(black_box(20_240_301), today()).expect("generate");
            black_box(state);
        })
    });
}

fn bench_aggregation(c: &mut Criterion) {
    let state = AppState::generate(20_240_301, today()).expect("generate");
    let centro = state
        .select_branch(BranchFilter::Only("centro".into()))
        .expect("known branch");

    c.bench_function("dashboard_stats_all", |b| {
        b.iter(|| black_box(state.dashboard_stats()))
    });
    c.bench_function("revenue_series_all", |b| {
        b.iter(|| black_box(state.revenue_series()))
    });
    c.bench_function("expense_categories_centro", |b| {
        b.iter(|| black_box(centro.category_totals(TransactionKind::Despesa)))
    });
    c.bench_function("debt_consultation_first_guardian", |b| {
        let guardian_id = state.guardians()[0].id.clone();
        b.iter(|| black_box(state.debt_consultation(&guardian_id, None).expect("consult")))
    });
}

criterion_group!(benches, bench_generation, bench_aggregation);
criterion_main!(benches);
