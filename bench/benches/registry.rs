//! Registry microbenchmarks using Criterion.
//!
//! These benchmarks measure individual registry operations in isolation:
//! - Entity creation
//! - Component add
//! - Flush with a growing number of systems
//! - Member iteration through a system
//! - A full particle frame

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use ember_bench::{
    components::*,
    particles::{ParticleConfig, Particles},
};
use ember_engine::ecs::Registry;

// =============================================================================
// Entity Benchmarks
// =============================================================================

fn bench_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("create");

    for count in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("empty", count), &count, |b, &n| {
            b.iter(|| {
                let mut registry = Registry::new();
                for _ in 0..n {
                    black_box(registry.create_entity());
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("two_components", count), &count, |b, &n| {
            b.iter(|| {
                let mut registry = Registry::new();
                for _ in 0..n {
                    let entity = registry.create_entity();
                    registry
                        .add_component(entity, Position::default())
                        .unwrap();
                    registry
                        .add_component(entity, Velocity::default())
                        .unwrap();
                }
                black_box(registry.entity_count());
            });
        });
    }

    group.finish();
}

// =============================================================================
// Flush Benchmarks
// =============================================================================

fn add_idle_systems(registry: &mut Registry, count: usize) {
    macro_rules! idle {
        ($($n:literal),*) => {
            $(
                if $n < count {
                    let system = IdleSystem::<$n>::new(registry.component_types());
                    registry.add_system(system).unwrap();
                }
            )*
        };
    }
    idle!(0, 1, 2, 3, 4, 5, 6, 7);
}

fn bench_flush(c: &mut Criterion) {
    let mut group = c.benchmark_group("flush");
    let entities = 10_000;
    group.throughput(Throughput::Elements(entities as u64));

    for systems in [1, 4, 8] {
        group.bench_with_input(BenchmarkId::new("systems", systems), &systems, |b, &n| {
            b.iter_batched(
                || {
                    let mut registry = Registry::new();
                    add_idle_systems(&mut registry, n);
                    for _ in 0..entities {
                        let entity = registry.create_entity();
                        registry
                            .add_component(entity, Position::default())
                            .unwrap();
                    }
                    registry
                },
                |mut registry| {
                    registry.update();
                    black_box(registry)
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// Iteration Benchmarks
// =============================================================================

fn bench_movement(c: &mut Criterion) {
    let mut group = c.benchmark_group("movement");

    for count in [1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(count as u64));

        let mut registry = Registry::new();
        let movement = MovementSystem::new(registry.component_types());
        registry.add_system(movement).unwrap();
        for _ in 0..count {
            let entity = registry.create_entity();
            registry
                .add_component(entity, Position::default())
                .unwrap();
            registry
                .add_component(entity, Velocity { x: 1.0, y: 0.5 })
                .unwrap();
        }
        registry.update();

        group.bench_function(BenchmarkId::new("update", count), |b| {
            b.iter(|| {
                registry
                    .with_system(|movement: &mut MovementSystem, registry| {
                        movement.update(registry, black_box(1.0 / 60.0))
                    })
                    .unwrap()
                    .unwrap();
            });
        });
    }

    group.finish();
}

// =============================================================================
// Scenario Benchmarks
// =============================================================================

fn bench_particles(c: &mut Criterion) {
    let mut group = c.benchmark_group("particles");

    for count in [1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));

        let mut particles = Particles::new(ParticleConfig {
            particle_count: count,
            ..ParticleConfig::default()
        })
        .unwrap();

        group.bench_function(BenchmarkId::new("frame", count), |b| {
            b.iter(|| particles.frame().unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_create,
    bench_flush,
    bench_movement,
    bench_particles
);
criterion_main!(benches);
