use birdwatcher::{Birdwatcher, BoidData};
use error::FlockError;
use flock::Flock;
use options::RunOptions;

pub mod birdwatcher;
pub mod boid;
pub mod color;
pub mod error;
pub mod flock;
pub mod math_helpers;
pub mod options;

/// Runs a flock headless for `no_iter` fixed steps of `delta_time` seconds
/// and returns what the birdwatcher sampled on the way.
pub fn flock_base(
    no_iter: u64,
    delta_time: f32,
    run_options: &RunOptions,
) -> Result<Vec<BoidData>, FlockError> {
    let ro = run_options;
    let mut flock = Flock::with_options(ro.init_boids, ro.window, ro.flock, ro.seed)?;
    let mut bird_watcher = Birdwatcher::new(ro.sample_rate);

    (0..no_iter).for_each(|_| {
        flock.step(delta_time, &ro.params);
        bird_watcher.watch(&flock);
    });

    Ok(bird_watcher.pop_data())
}
