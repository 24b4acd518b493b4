use std::{
    io::{self, BufWriter, Write},
    time::{Duration, Instant},
};

use anyhow::Result;
use circular_queue::CircularQueue;
use clap_serde_derive::clap::Parser;
use flocking_lib::flock::{BoidSnapshot, Flock};
use serde::Serialize;
use tracing::{debug, info};

mod cliargs;
use cliargs::{load_config, Args};

// how many recent step timings the rolling average covers
const TIMING_WINDOW: usize = 120;

#[derive(Serialize)]
struct FrameDump<'a> {
    frame: u64,
    boids: &'a [BoidSnapshot],
}

fn main() -> Result<()> {
    init_tracing();

    // Parse whole args with clap
    let mut args = Args::parse();
    let config = load_config(&mut args)?;

    let world = config.world()?;
    let delta_time = config.delta_time()?;
    let options = config.flock_options();
    let params = config.params();

    let mut flock = Flock::with_options(config.no_boids, world, options, config.seed())?;
    info!(
        boids = flock.len(),
        width = world.width,
        height = world.height,
        frames = config.frames,
        fps = config.fps,
        update_order = ?options.update_order,
        "starting flock"
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut step_times: CircularQueue<Duration> = CircularQueue::with_capacity(TIMING_WINDOW);

    for frame in 0..config.frames {
        let started = Instant::now();
        flock.step(delta_time, &params);
        step_times.push(started.elapsed());

        if config.dump {
            let snapshot = flock.snapshot(&params);
            serde_json::to_writer(
                &mut out,
                &FrameDump {
                    frame,
                    boids: &snapshot,
                },
            )?;
            writeln!(out)?;
        }

        if config.log_every != 0 && frame % config.log_every == 0 {
            let stats = flock.stats();
            info!(
                frame,
                polarization = stats.polarization,
                mean_hue = ?stats.mean_hue,
                hue_spread = stats.hue_spread,
                avg_step_micros = average_micros(&step_times),
                "flock stats"
            );
        }
    }

    out.flush()?;

    let stats = flock.stats();
    debug!(?stats, "final state");
    info!(
        frames = config.frames,
        simulated_seconds = config.frames as f32 * delta_time,
        polarization = stats.polarization,
        "done"
    );

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn average_micros(step_times: &CircularQueue<Duration>) -> f64 {
    if step_times.len() == 0 {
        return 0.;
    }

    let total: Duration = step_times.iter().sum();
    total.as_micros() as f64 / step_times.len() as f64
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use circular_queue::CircularQueue;

    use super::average_micros;

    #[test]
    fn averages_only_the_recent_window() {
        let mut step_times = CircularQueue::with_capacity(2);
        step_times.push(Duration::from_micros(1000));
        step_times.push(Duration::from_micros(10));
        step_times.push(Duration::from_micros(30));

        assert_eq!(average_micros(&step_times), 20.);
    }

    #[test]
    fn empty_window_averages_to_zero() {
        let step_times: CircularQueue<Duration> = CircularQueue::with_capacity(4);
        assert_eq!(average_micros(&step_times), 0.);
    }
}
