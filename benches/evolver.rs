//! Benchmarks for the evolver.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use gromit::{Evolver, EvolverConfig, Parameters, Schema};

fn sphere(p: &Parameters) -> f64 {
    -p.iter().map(|(_, v)| (v - 0.5) * (v - 0.5)).sum::<f64>()
}

fn bench_evolve_population(c: &mut Criterion) {
    let mut group = c.benchmark_group("evolve_population");

    for size in [30, 100, 1000] {
        let config = EvolverConfig {
            population_size: size,
            random_seed: Some(42),
            ..Default::default()
        };
        let schema = Schema::new(["x", "y"]).unwrap();
        let mut evolver = Evolver::new(schema, sphere, config).unwrap();
        evolver.evolve().unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(evolver.evolve().unwrap()));
        });
    }

    group.finish();
}

fn bench_evolve_schema_width(c: &mut Criterion) {
    let mut group = c.benchmark_group("evolve_schema_width");

    for width in [2, 16, 128] {
        let names: Vec<String> = (0..width).map(|i| format!("p{}", i)).collect();
        let schema = Schema::new(names).unwrap();
        let config = EvolverConfig {
            random_seed: Some(42),
            ..Default::default()
        };
        let mut evolver = Evolver::new(schema, sphere, config).unwrap();
        evolver.evolve().unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_params", width)),
            &width,
            |b, _| {
                b.iter(|| black_box(evolver.evolve().unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_evolve_population, bench_evolve_schema_width);
criterion_main!(benches);
