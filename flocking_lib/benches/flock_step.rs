use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flocking_lib::{
    flock::Flock,
    options::{FlockOptions, SimulationParams, UpdateOrder, WorldSize},
};

fn flock_step(c: &mut Criterion) {
    let world = WorldSize::new(1200., 900.).unwrap();
    let params = SimulationParams::default();
    let mut group = c.benchmark_group("flock_step");

    for no_boids in [60usize, 120, 240] {
        for update_order in [UpdateOrder::Snapshot, UpdateOrder::InPlace] {
            let options = FlockOptions {
                update_order,
                ..Default::default()
            };
            let mut flock = Flock::with_options(no_boids, world, options, Some(0)).unwrap();

            group.bench_with_input(
                BenchmarkId::new(format!("{update_order:?}"), no_boids),
                &no_boids,
                |b, _| b.iter(|| flock.step(black_box(1. / 60.), &params)),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, flock_step);
criterion_main!(benches);
