use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizcraft_core::similarity::{cosine_distance, score};

fn make_vector(dim: usize, seed: f32) -> Vec<f32> {
    (0..dim).map(|i| ((i as f32) * seed).sin()).collect()
}

fn bench_cosine_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("cosine_distance");

    for &dim in &[384usize, 1024, 1536] {
        let a = make_vector(dim, 0.1);
        let b = make_vector(dim, 0.2);
        group.bench_function(format!("dim={dim}"), |bench| {
            bench.iter(|| cosine_distance(black_box(&a), black_box(&b)))
        });
    }

    group.finish();
}

fn bench_score(c: &mut Criterion) {
    let a = make_vector(1536, 0.1);
    let b = make_vector(1536, 0.2);
    c.bench_function("score_dim_1536", |bench| {
        bench.iter(|| score(black_box(&a), black_box(&b)))
    });
}

criterion_group!(benches, bench_cosine_distance, bench_score);
criterion_main!(benches);
