//! Benchmarks for scoring and ranking.

use catalog_search::{fuzzy_score, levenshtein_distance, SearchEngine};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

struct Item {
    name: String,
    sku: String,
    description: String,
}

fn create_test_items(count: usize) -> Vec<Item> {
    const NOUNS: [&str; 6] = ["laptop", "monitor", "keyboard", "mouse", "headset", "webcam"];
    (0..count)
        .map(|i| Item {
            name: format!("{} model {}", NOUNS[i % NOUNS.len()], i),
            sku: format!("SKU-{i:06}"),
            description: format!("Refurbished {} with {} month warranty", NOUNS[(i + 2) % NOUNS.len()], i % 24),
        })
        .collect()
}

fn bench_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("scoring");

    group.bench_function("levenshtein_short", |b| {
        b.iter(|| levenshtein_distance(black_box("laptop"), black_box("leptop stand")))
    });

    group.bench_function("fuzzy_score_similarity_tier", |b| {
        b.iter(|| fuzzy_score(black_box("keybord"), black_box("refurbished mouse with 3 month warranty")))
    });

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let engine = SearchEngine::<Item>::builder()
        .weighted_field("name", 3.0, |i| Some(i.name.as_str()))
        .weighted_field("sku", 2.0, |i| Some(i.sku.as_str()))
        .weighted_field("description", 1.0, |i| Some(i.description.as_str()))
        .build()
        .expect("valid engine");

    let mut group = c.benchmark_group("search");

    for size in [100, 1_000, 10_000].iter() {
        let items = create_test_items(*size);
        group.bench_with_input(BenchmarkId::new("query", size), size, |b, _| {
            b.iter(|| engine.search(black_box(&items), black_box("laptp"), 50))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scoring, bench_search);
criterion_main!(benches);
