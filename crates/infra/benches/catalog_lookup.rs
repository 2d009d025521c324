use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use shopfront_core::ProductId;
use shopfront_infra::{CatalogStore, InMemoryCatalogSource};

fn catalog_document(size: i64) -> Vec<u8> {
    let products: Vec<serde_json::Value> = (1..=size)
        .map(|id| serde_json::json!({"id": id, "name": format!("Product {id}"), "price": id as f64 * 1.25}))
        .collect();
    serde_json::to_vec(&serde_json::json!({ "products": products })).unwrap()
}

fn bench_get_by_id(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog_get_by_id");
    for size in [10_i64, 1_000, 100_000] {
        let store = CatalogStore::new(InMemoryCatalogSource::new(catalog_document(size)));
        store.snapshot();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| store.get_by_id(black_box(ProductId::new(size / 2 + 1))))
        });
    }
    group.finish();
}

fn bench_list(c: &mut Criterion) {
    let store = CatalogStore::new(InMemoryCatalogSource::new(catalog_document(1_000)));
    store.snapshot();

    c.bench_function("catalog_list_1000", |b| b.iter(|| black_box(store.list())));
}

fn bench_cold_load(c: &mut Criterion) {
    let doc = catalog_document(1_000);
    c.bench_function("catalog_cold_load_1000", |b| {
        b.iter(|| {
            let store = CatalogStore::new(InMemoryCatalogSource::new(doc.clone()));
            black_box(store.load().map(|catalog| catalog.len()).unwrap_or_default())
        })
    });
}

criterion_group!(benches, bench_get_by_id, bench_list, bench_cold_load);
criterion_main!(benches);
