//! Generation benchmarks

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use emberdelve::{DungeonBuilder, DungeonConfig};

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    let configs = [
        ("small", DungeonConfig::small()),
        ("default", DungeonConfig::default()),
        ("large", DungeonConfig::large()),
    ];

    for (name, config) in configs {
        group.bench_with_input(BenchmarkId::from_parameter(name), &config, |b, config| {
            b.iter(|| {
                DungeonBuilder::new(config.clone())
                    .with_seed(42)
                    .build()
                    .expect("benchmark config must generate")
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
