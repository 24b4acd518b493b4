use std::mem;

use glam::Vec2;
use serde::Serialize;

use crate::{
    boid::Boid,
    flock::Flock,
    math_helpers::{hue_to_unit, unit_to_hue},
};

// so right now, this is more of a bird data acummulator than a birdwatcher
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct BoidData {
    pub id: usize,
    pub x: f32,
    pub y: f32,
    pub hue: f32,
    pub time: u64,
}

/// Collects boid locations every `sample_rate`-th frame.
pub struct Birdwatcher {
    locations: Vec<BoidData>,
    render_ticker: u64,
    sample_rate: u64,
}

impl Birdwatcher {
    /// A `sample_rate` of 0 is treated as 1, i.e. sample every frame.
    pub fn new(sample_rate: u64) -> Self {
        Birdwatcher {
            locations: Vec::new(),
            render_ticker: 0,
            sample_rate: sample_rate.max(1),
        }
    }

    /// Triggers data collection
    pub fn watch(&mut self, flock: &Flock) {
        if !self.should_sample() {
            return;
        }

        let time = self.render_ticker / self.sample_rate;
        self.locations.extend(flock.boids().iter().map(|b| BoidData {
            id: b.id,
            x: b.position.x,
            y: b.position.y,
            hue: b.current_color.hue,
            time,
        }));
    }

    pub fn restart(&mut self) {
        self.locations.clear();
        self.render_ticker = 0;
    }

    pub fn pop_data(&mut self) -> Vec<BoidData> {
        mem::take(&mut self.locations)
    }

    fn should_sample(&mut self) -> bool {
        self.render_ticker += 1;
        self.render_ticker % self.sample_rate == 0
    }
}

/// Flock-wide summary of one frame.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct FlockStats {
    pub boids: usize,
    /// length of the mean heading, 0 for a disordered flock, 1 when everyone
    /// faces the same way
    pub polarization: f32,
    /// circular mean of the current hues, `None` if they cancel out
    pub mean_hue: Option<f32>,
    /// 0 when every boid has the same hue, up to 1 for hues spread evenly
    pub hue_spread: f32,
}

impl FlockStats {
    pub fn observe(boids: &[Boid]) -> Self {
        if boids.is_empty() {
            return FlockStats {
                boids: 0,
                polarization: 0.,
                mean_hue: None,
                hue_spread: 0.,
            };
        }

        let count = boids.len() as f32;
        let (heading_sum, hue_sum) = boids
            .iter()
            .fold((Vec2::ZERO, Vec2::ZERO), |(heading, hue), b| {
                (heading + b.heading, hue + hue_to_unit(b.current_color.hue))
            });

        let hue_mean = hue_sum / count;

        FlockStats {
            boids: boids.len(),
            polarization: (heading_sum / count).length(),
            mean_hue: unit_to_hue(hue_mean),
            hue_spread: (1. - hue_mean.length()).max(0.),
        }
    }
}
