//! Benchmarks for candidate generation operators.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use weight_tuner::{compute::ParameterRng, schema::OptimizerConfig};

fn databases(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("db{:02}", i)).collect()
}

fn bench_neighbor(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbor");

    for count in [1, 3, 10, 50] {
        let config = OptimizerConfig::new(databases(count)).with_mutator(0.01, 0.005);
        let mut rng = ParameterRng::new(42);
        let parent = rng.random_parameters(&config).expect("random parameters");

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{} databases", count)),
            &count,
            |b, _| {
                b.iter(|| {
                    rng.neighbor(black_box(&parent), Some(0.1), &config)
                        .expect("neighbor")
                });
            },
        );
    }

    group.finish();
}

fn bench_recombine(c: &mut Criterion) {
    let mut group = c.benchmark_group("recombine");

    for count in [1, 3, 10, 50] {
        let config = OptimizerConfig::new(databases(count));
        let mut rng = ParameterRng::new(42);
        let a = rng.random_parameters(&config).expect("random parameters");
        let b = rng.random_parameters(&config).expect("random parameters");

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{} databases", count)),
            &count,
            |bench, _| {
                bench.iter(|| {
                    rng.recombine(black_box(&a), black_box(&b), &config)
                        .expect("recombine")
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_neighbor, bench_recombine);
criterion_main!(benches);
