use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kmeans_multi::cluster::{seed, Assigner, Dataset};
use rand::prelude::*;

fn random_dataset(n: usize, dim: usize) -> Dataset {
    let mut rng = StdRng::seed_from_u64(42);
    let mut data = Dataset::new(dim).unwrap();
    let mut row = vec![0.0; dim];
    for _ in 0..n {
        for v in row.iter_mut() {
            *v = rng.gen_range(-100.0..100.0);
        }
        data.push(&row, "BLANK").unwrap();
    }
    data
}

fn bench_assign(c: &mut Criterion) {
    let data = random_dataset(20_000, 8);
    let means = seed::first_k(&data, 16).unwrap();
    let mut group = c.benchmark_group("assign");

    for threads in [1, 2, 4, 8] {
        let assigner = Assigner::new(threads).unwrap();
        let mut out = vec![0; data.len()];
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, _| {
            b.iter(|| assigner.assign(black_box(&data), black_box(&means), &mut out))
        });
    }
    group.finish();
}

fn bench_plus_plus(c: &mut Criterion) {
    let data = random_dataset(5_000, 8);
    c.bench_function("k-means++ seeding k=16", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(7);
            seed::plus_plus(black_box(&data), 16, &mut rng).unwrap()
        })
    });
}

criterion_group!(benches, bench_assign, bench_plus_plus);
criterion_main!(benches);
