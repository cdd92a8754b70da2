// Performance benchmarks for fitting and querying the recommender
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use recipex::prelude::*;

const PANTRY: [&str; 24] = [
    "chicken", "beef", "pork", "garlic", "onion", "tomato", "basil", "rice", "beans", "egg",
    "milk", "flour", "butter", "lemon", "pepper", "cumin", "ginger", "salmon", "potato",
    "carrot", "wine", "cheese", "spinach", "mushroom",
];

fn generate_corpus(n: usize, rng: &mut StdRng) -> Vec<RecipeRecord> {
    (0..n)
        .map(|i| {
            let words: Vec<&str> = (0..rng.random_range(3..8))
                .map(|_| PANTRY[rng.random_range(0..PANTRY.len())])
                .collect();
            RecipeRecord::new(format!("recipe {}", i), words.join(", "))
                .with_prep_time(rng.random_range(5.0..180.0))
                .with_nutrition([
                    rng.random_range(50.0..1200.0),
                    rng.random_range(0.0..80.0),
                    rng.random_range(0.0..150.0),
                    rng.random_range(0.0..90.0),
                    rng.random_range(0.0..400.0),
                    rng.random_range(0.0..3000.0),
                    rng.random_range(0.0..20.0),
                ])
        })
        .collect()
}

fn bench_config() -> EngineConfig {
    EngineConfig {
        target_dim: 16,
        ..Default::default()
    }
}

fn benchmark_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit");
    group.sample_size(10);

    for size in [100, 1000, 5000].iter() {
        let mut rng = StdRng::seed_from_u64(42);
        let corpus = generate_corpus(*size, &mut rng);
        group.bench_with_input(BenchmarkId::new("recipex", size), &corpus, |b, corpus| {
            b.iter(|| FittedEngine::fit(black_box(corpus.clone()), &bench_config()).unwrap());
        });
    }

    group.finish();
}

fn benchmark_recommend(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommend");

    for size in [1000, 10000].iter() {
        let mut rng = StdRng::seed_from_u64(7);
        let engine = FittedEngine::fit(generate_corpus(*size, &mut rng), &bench_config()).unwrap();
        let query = RecipeQuery::new("chicken garlic lemon")
            .with_prep_time(30.0)
            .with_calories(450.0);

        for k in [5, 50].iter() {
            group.bench_with_input(
                BenchmarkId::new(format!("corpus_{}", size), k),
                k,
                |b, &k| {
                    b.iter(|| engine.recommend_scored(black_box(&query), k).unwrap());
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, benchmark_fit, benchmark_recommend);
criterion_main!(benches);
