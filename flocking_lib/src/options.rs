use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::FlockError;

/// Knobs the presentation layer may turn between frames.
///
/// Read at the start of every [`Flock::step`](crate::flock::Flock::step). No
/// validation is done, zero and negative weights are fine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// visual scale of a boid, only used for rendering
    pub boid_size: f32,
    pub cohesion_weight: f32,
    pub alignment_weight: f32,
    pub separation_weight: f32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        SimulationParams {
            boid_size: 20.,
            cohesion_weight: 0.7,
            alignment_weight: 0.8,
            separation_weight: 1.4,
        }
    }
}

/// How the flock sees its own state during a step.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
// {"type": "Snapshot"}
pub enum UpdateOrder {
    /// every boid reads the previous frame, results are committed together
    Snapshot,
    /// boids are updated one after another, later ones see earlier ones' new state
    InPlace,
}

/// Fixed constants of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockOptions {
    /// neighbourhood radius for cohesion, alignment and colour diffusion
    pub sight_radius: f32,
    pub separation_radius: f32,
    /// half angle of the visibility cone, in radians `[0, π]`
    pub cone_of_vision: f32,
    /// fraction of a turn still left after one second, in `(0, 1)`;
    /// smaller turns faster
    pub smoothing: f32,
    /// units per second
    pub boid_speed: f32,
    /// how far past the world edge a boid travels before it wraps
    pub wrap_padding: f32,
    pub color_saturation: f32,
    pub color_value: f32,
    pub field_of_vision_on: bool,
    pub color_diffusion_on: bool,
    pub update_order: UpdateOrder,
}

impl FlockOptions {
    pub fn validate(&self) -> Result<(), FlockError> {
        if !(self.sight_radius.is_finite() && self.sight_radius > 0.) {
            return Err(FlockError::InvalidOptions(
                "sight_radius must be positive and finite",
            ));
        }
        if !(self.separation_radius.is_finite() && self.separation_radius > 0.) {
            return Err(FlockError::InvalidOptions(
                "separation_radius must be positive and finite",
            ));
        }
        if !self.cone_of_vision.is_finite() {
            return Err(FlockError::InvalidOptions("cone_of_vision must be finite"));
        }
        if !(self.smoothing > 0. && self.smoothing < 1.) {
            return Err(FlockError::InvalidOptions("smoothing must be in (0, 1)"));
        }
        if !(self.boid_speed.is_finite() && self.boid_speed >= 0.) {
            return Err(FlockError::InvalidOptions(
                "boid_speed must be non-negative and finite",
            ));
        }
        if !(self.wrap_padding.is_finite() && self.wrap_padding >= 0.) {
            return Err(FlockError::InvalidOptions(
                "wrap_padding must be non-negative and finite",
            ));
        }
        if !(0.0..=1.0).contains(&self.color_saturation) || !(0.0..=1.0).contains(&self.color_value)
        {
            return Err(FlockError::InvalidOptions(
                "color saturation and value must be in [0, 1]",
            ));
        }

        Ok(())
    }
}

impl Default for FlockOptions {
    fn default() -> Self {
        FlockOptions {
            sight_radius: 100.,
            separation_radius: 50.,
            cone_of_vision: PI * 0.8,
            smoothing: 0.02,
            boid_speed: 85.,
            wrap_padding: 10.,
            color_saturation: 0.8,
            color_value: 0.7,
            field_of_vision_on: true,
            color_diffusion_on: true,
            update_order: UpdateOrder::Snapshot,
        }
    }
}

/// Size of the visible world, `[0, width) × [0, height)`.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct WorldSize {
    pub width: f32,
    pub height: f32,
}

impl WorldSize {
    pub fn new(width: f32, height: f32) -> Result<Self, FlockError> {
        if width.is_finite() && height.is_finite() && width > 0. && height > 0. {
            Ok(WorldSize { width, height })
        } else {
            Err(FlockError::InvalidWorldSize { width, height })
        }
    }
}

/// Everything needed for a headless run, see [`crate::flock_base`].
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub init_boids: usize,
    pub window: WorldSize,
    pub flock: FlockOptions,
    pub params: SimulationParams,
    /// sample every n-th step
    pub sample_rate: u64,
    pub seed: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            init_boids: 60,
            window: WorldSize {
                width: 1200.,
                height: 900.,
            },
            flock: Default::default(),
            params: Default::default(),
            sample_rate: 1,
            seed: None,
        }
    }
}
