use std::collections::HashSet;
use std::mem;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::birdwatcher::FlockStats;
use crate::boid::Boid;
use crate::color::Hsv;
use crate::error::FlockError;
use crate::math_helpers::Rotate2;
use crate::options::{FlockOptions, SimulationParams, UpdateOrder, WorldSize};

/// What the renderer gets for every boid, once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoidSnapshot {
    pub id: usize,
    pub position: Vec2,
    pub heading: Vec2,
    pub color: Hsv,
    pub rgb: [f32; 3],
    pub render_scale: f32,
}

impl BoidSnapshot {
    /// Corners of the triangle the boid is drawn as: the tip along the
    /// heading, the two back corners rotated ±0.8π around the position.
    pub fn triangle(&self) -> [Vec2; 3] {
        const BACK_CORNER: f32 = std::f32::consts::PI * 0.8;

        let scaled_dir = self.heading * self.render_scale;
        [
            self.position + scaled_dir,
            self.position + scaled_dir.rotated(-BACK_CORNER),
            self.position + scaled_dir.rotated(BACK_CORNER),
        ]
    }
}

/// Owns the boids and moves them along, one frame per [`Flock::step`].
///
/// Uses an O(N^2) scan for finding each boid's neighbours.
pub struct Flock {
    boids: Vec<Boid>,
    // next frame is written here, then swapped with `boids`
    scratch: Vec<Boid>,
    world: WorldSize,
    options: FlockOptions,
}

impl Flock {
    /// Flock of `agent_count` randomly placed boids with default options.
    pub fn new(
        agent_count: usize,
        world_width: f32,
        world_height: f32,
    ) -> Result<Self, FlockError> {
        let world = WorldSize::new(world_width, world_height)?;
        Flock::with_options(agent_count, world, FlockOptions::default(), None)
    }

    /// Randomly placed boids. Given a `seed` the same build places them the
    /// same way every time.
    pub fn with_options(
        agent_count: usize,
        world: WorldSize,
        options: FlockOptions,
        seed: Option<u64>,
    ) -> Result<Self, FlockError> {
        // `WorldSize` has public fields, check it again
        let world = WorldSize::new(world.width, world.height)?;
        options.validate()?;

        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

        debug!(
            agent_count,
            width = world.width,
            height = world.height,
            seed,
            "initializing flock"
        );

        let boids = (0..agent_count)
            .map(|id| Boid::new(&mut rng, id, &world, &options))
            .collect();

        Ok(Flock::assemble(boids, world, options))
    }

    /// Flock from boids placed by hand. Ids must be unique, they are used to
    /// tell a boid apart from its neighbours.
    pub fn from_boids(
        boids: Vec<Boid>,
        world: WorldSize,
        options: FlockOptions,
    ) -> Result<Self, FlockError> {
        let world = WorldSize::new(world.width, world.height)?;
        options.validate()?;

        if let Some(bad) = boids.iter().find(|b| {
            !b.position.is_finite() || !b.heading.is_finite() || b.heading.length_squared() == 0.
        }) {
            return Err(FlockError::InvalidBoid { id: bad.id });
        }

        let mut seen = HashSet::with_capacity(boids.len());
        if let Some(dup) = boids.iter().find(|b| !seen.insert(b.id)) {
            return Err(FlockError::DuplicateBoidId { id: dup.id });
        }

        Ok(Flock::assemble(boids, world, options))
    }

    fn assemble(boids: Vec<Boid>, world: WorldSize, options: FlockOptions) -> Self {
        Flock {
            scratch: Vec::with_capacity(boids.len()),
            boids,
            world,
            options,
        }
    }

    /// Advances every boid by `delta_time` seconds.
    ///
    /// Negative or non-finite time steps are treated as zero.
    pub fn step(&mut self, delta_time: f32, params: &SimulationParams) {
        let delta_time = if delta_time.is_finite() && delta_time >= 0. {
            delta_time
        } else {
            warn!(delta_time, "ignoring invalid time step");
            0.
        };

        trace!(delta_time, boids = self.boids.len(), "flock step");

        match self.options.update_order {
            UpdateOrder::Snapshot => {
                self.scratch.clear();
                for i_cur in 0..self.boids.len() {
                    let next = Flock::advance(
                        &self.boids,
                        i_cur,
                        delta_time,
                        &self.world,
                        &self.options,
                        params,
                    );
                    self.scratch.push(next);
                }
                mem::swap(&mut self.boids, &mut self.scratch);
            }
            UpdateOrder::InPlace => {
                for i_cur in 0..self.boids.len() {
                    self.boids[i_cur] = Flock::advance(
                        &self.boids,
                        i_cur,
                        delta_time,
                        &self.world,
                        &self.options,
                        params,
                    );
                }
            }
        }
    }

    /// Next state of `boids[index]`, computed only from `boids`.
    fn advance(
        boids: &[Boid],
        index: usize,
        delta_time: f32,
        world: &WorldSize,
        options: &FlockOptions,
        params: &SimulationParams,
    ) -> Boid {
        let b_current = &boids[index];

        // each rule narrows this down to its own radius
        let reach = options.sight_radius.max(options.separation_radius);
        let mut neighbours: Vec<&Boid> = Vec::new();
        Flock::get_neighbours_naive(b_current, boids, reach, &mut neighbours);

        let target = b_current.run_rules(&neighbours, options, params);

        let mut next = *b_current;
        if options.color_diffusion_on {
            next.current_color = b_current.local_color(&neighbours, options);
        }
        next.steer(target, delta_time, options);
        next.update_location(delta_time, world, options);

        next
    }

    /// Collects every other boid closer than `radius`.
    pub fn get_neighbours_naive<'a>(
        boid: &Boid,
        all_boids: &'a [Boid],
        radius: f32,
        neighbours: &mut Vec<&'a Boid>,
    ) {
        for b_other in all_boids.iter() {
            if b_other.id == boid.id {
                continue;
            }

            if boid.position.distance(b_other.position) < radius {
                neighbours.push(b_other);
            }
        }
    }

    /// Read-only view for the renderer, in flock order.
    pub fn snapshot(&self, params: &SimulationParams) -> Vec<BoidSnapshot> {
        self.boids
            .iter()
            .map(|b| BoidSnapshot {
                id: b.id,
                position: b.position,
                heading: b.heading,
                color: b.current_color,
                rgb: b.current_color.to_rgb(),
                render_scale: params.boid_size,
            })
            .collect()
    }

    pub fn stats(&self) -> FlockStats {
        FlockStats::observe(&self.boids)
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    pub fn world(&self) -> &WorldSize {
        &self.world
    }

    /// Follows a resized window. Boids outside the new bounds wrap on the
    /// next step.
    pub fn set_world(&mut self, world: WorldSize) -> Result<(), FlockError> {
        self.world = WorldSize::new(world.width, world.height)?;
        Ok(())
    }

    pub fn options(&self) -> &FlockOptions {
        &self.options
    }
}
