//! Benchmarks for store transitions.
//!
//! Measures building a form field by field and reordering a large form.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use form_builder::model::{FieldType, NewField};
use form_builder::state::{ReorderPolicy, Store, StoreState};

fn store_with_fields(count: usize) -> (Store, Vec<String>) {
    let mut store = Store::new(StoreState::new());
    store.create_form("Benchmark", "");
    let ids = (0..count)
        .filter_map(|i| {
            store
                .add_field(NewField::new(FieldType::Text, format!("field_{}", i)))
                .ok()
                .flatten()
        })
        .collect();
    (store, ids)
}

fn bench_add_fields(c: &mut Criterion) {
    c.bench_function("add_field_50", |b| {
        b.iter(|| store_with_fields(black_box(50)))
    });
}

fn bench_reorder(c: &mut Criterion) {
    let (store, ids) = store_with_fields(200);
    let reversed: Vec<String> = ids.iter().rev().cloned().collect();
    for policy in [ReorderPolicy::Filter, ReorderPolicy::Preserve] {
        let mut store = Store::new(store.state().clone()).with_reorder_policy(policy);
        c.bench_function(&format!("reorder_200_{}", policy), |b| {
            b.iter(|| store.reorder_fields(black_box(reversed.iter())))
        });
    }
}

criterion_group!(benches, bench_add_fields, bench_reorder);
criterion_main!(benches);
