/*
 * Flock Simulation Benchmark
 *
 * This file contains benchmarks for the flocking simulation to identify
 * performance bottlenecks. It measures the full step loop (brute-force
 * neighbor scan plus force integration) at several population sizes, with
 * the parallel force phase both enabled and disabled.
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use std::time::Duration;

use boids3d::{Flock, SimulationParams};

const STEP: f32 = 1.0 / 60.0;

fn spawned_flock(boid_count: usize, parallel: bool) -> Flock {
    let params = SimulationParams {
        boid_count,
        parallel,
        swirl_strength: 40.0,
        rng_seed: Some(0xBE7C),
        ..SimulationParams::default()
    };
    let mut flock = Flock::new(Vec3::ZERO, params).expect("benchmark params are valid");
    flock.spawn();
    flock
}

// Benchmark the overall update loop with the parallel force phase
fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("flock_step");

    for num_boids in [100, 250, 500, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(num_boids), num_boids, |b, &n| {
            let mut flock = spawned_flock(n, true);
            b.iter(|| {
                flock.step(black_box(STEP));
            });
        });
    }

    group.finish();
}

// Benchmark the same loop sequentially to expose the rayon crossover point
fn bench_step_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("flock_step_sequential");

    for num_boids in [100, 250, 500, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(num_boids), num_boids, |b, &n| {
            let mut flock = spawned_flock(n, false);
            b.iter(|| {
                flock.step(black_box(STEP));
            });
        });
    }

    group.finish();
}

// Configure the benchmarks
criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(10)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1));
    targets = bench_step, bench_step_sequential
}

criterion_main!(benches);
