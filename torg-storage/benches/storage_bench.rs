//! Benchmarks for the storage hot paths: substring text scan and
//! co-occurrence pair aggregation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use torg_core::models::Product;
use torg_core::traits::{IPairRepository, IProductRepository, TextField};
use torg_storage::StorageEngine;

const DIM: usize = 8;

fn seeded_engine() -> StorageEngine {
    let storage = StorageEngine::open_in_memory(DIM).expect("storage");
    for i in 0..1000 {
        let product = Product {
            id: format!("p{i}"),
            title: format!("Product number {i} metal widget"),
            description: format!("Long description for product {i}"),
            brand: format!("Brand{}", i % 20),
            color: "blue".into(),
            age_bucket: "adult".into(),
            product_type: "Widgets".into(),
            seasons: vec!["summer".into()],
            season_relevancy_factor: 0.0,
            price_original: 10.0,
            price_current: 10.0,
            is_on_sale: false,
            stock_level: i as i64,
            title_embedding: None,
            description_embedding: None,
        };
        storage.upsert_product(&product).expect("upsert");
    }
    for i in 0..500 {
        storage
            .upsert_pair(&format!("p{}", i), &format!("p{}", i + 500), (1 + i % 5) as i64)
            .expect("pair");
    }
    storage
}

fn bench_text_scan(c: &mut Criterion) {
    let storage = seeded_engine();
    c.bench_function("text_match_1000_products", |b| {
        b.iter(|| {
            let hits = storage
                .find_by_text_match(
                    &[TextField::Title, TextField::Description, TextField::Brand],
                    black_box("metal"),
                )
                .expect("search");
            black_box(hits)
        })
    });
}

fn bench_pair_aggregation(c: &mut Criterion) {
    let storage = seeded_engine();
    let purchased: Vec<String> = (0..20).map(|i| format!("p{i}")).collect();
    c.bench_function("aggregate_pairs_20_products", |b| {
        b.iter(|| {
            let totals = storage
                .aggregate_pairs_for_products(black_box(&purchased))
                .expect("aggregate");
            black_box(totals)
        })
    });
}

criterion_group!(benches, bench_text_scan, bench_pair_aggregation);
criterion_main!(benches);
