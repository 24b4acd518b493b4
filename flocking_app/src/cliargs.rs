// https://docs.rs/clap-serde/latest/clap_serde/#
// https://stackoverflow.com/questions/55133351/is-there-a-way-to-get-clap-to-use-default-values-from-a-file
use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use clap_serde_derive::{
    clap::{self, Parser},
    serde::Serialize,
    ClapSerde,
};
use flocking_lib::options::{FlockOptions, SimulationParams, UpdateOrder, WorldSize};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Headless driver for the hue diffusing boids flock.
pub struct Args {
    /// Config file, `.toml` or yaml
    #[arg(short, long = "config", default_value = "config.toml")]
    pub config_path: std::path::PathBuf,

    /// Rest of arguments
    #[command(flatten)]
    pub config: <Config as ClapSerde>::Opt,
}

#[derive(ClapSerde, Serialize)]
/// Programatic configuration
///
/// Uses defaults, which can be overwritten by specifying a filepath for the `-c` or `--config` arg option
pub struct Config {
    #[default(60)]
    #[arg(short = 'n', long)]
    /// number of boids
    pub no_boids: usize,

    #[default(1200.)]
    #[arg(short = 'x', long)]
    pub width: f32,

    #[default(900.)]
    #[arg(short = 'y', long)]
    pub height: f32,

    #[default(600)]
    #[arg(short = 'f', long)]
    /// number of frames to simulate
    pub frames: u64,

    #[default(60.)]
    #[arg(long)]
    /// simulated frame rate, every step advances 1/fps seconds
    pub fps: f32,

    #[default(0)]
    #[arg(long)]
    /// rng seed, 0 picks a random one
    pub seed: u64,

    #[default(20.)]
    #[arg(long = "size")]
    pub boid_size: f32,
    #[default(0.7)]
    #[arg(long = "coh")]
    pub cohesion_weight: f32,
    #[default(0.8)]
    #[arg(long = "ali")]
    pub alignment_weight: f32,
    #[default(1.4)]
    #[arg(long = "sep")]
    pub separation_weight: f32,

    #[default(100.)]
    #[arg(long = "sight")]
    pub sight_radius: f32,
    #[default(50.)]
    #[arg(long = "sep-radius")]
    pub separation_radius: f32,

    #[default(60)]
    #[arg(long)]
    /// log flock stats every n frames, 0 turns it off
    pub log_every: u64,

    #[default(false)]
    #[arg(long)]
    /// print every frame's snapshot as a JSON line
    pub dump: bool,
    #[default(false)]
    #[arg(long)]
    /// update boids one after another, later boids see the moved earlier ones
    pub in_place: bool,
    #[default(false)]
    #[arg(long)]
    pub no_fov: bool,
    #[default(false)]
    #[arg(long)]
    pub no_color: bool,
}

impl Config {
    pub fn world(&self) -> Result<WorldSize> {
        Ok(WorldSize::new(self.width, self.height)?)
    }

    pub fn delta_time(&self) -> Result<f32> {
        if !(self.fps.is_finite() && self.fps > 0.) {
            bail!("fps must be positive, got {}", self.fps);
        }
        Ok(1. / self.fps)
    }

    pub fn seed(&self) -> Option<u64> {
        match self.seed {
            0 => None,
            seed => Some(seed),
        }
    }

    pub fn flock_options(&self) -> FlockOptions {
        FlockOptions {
            sight_radius: self.sight_radius,
            separation_radius: self.separation_radius,
            field_of_vision_on: !self.no_fov,
            color_diffusion_on: !self.no_color,
            update_order: if self.in_place {
                UpdateOrder::InPlace
            } else {
                UpdateOrder::Snapshot
            },
            ..Default::default()
        }
    }

    pub fn params(&self) -> SimulationParams {
        SimulationParams {
            boid_size: self.boid_size,
            cohesion_weight: self.cohesion_weight,
            alignment_weight: self.alignment_weight,
            separation_weight: self.separation_weight,
        }
    }
}

/// Parses a config file body, toml for `.toml` paths and yaml otherwise.
pub fn parse_config_file(path: &Path, contents: &str) -> Result<<Config as ClapSerde>::Opt> {
    let is_toml = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("toml"));

    let config = if is_toml {
        toml::from_str(contents)
            .with_context(|| format!("error in configuration file {}", path.display()))?
    } else {
        serde_yaml::from_str(contents)
            .with_context(|| format!("error in configuration file {}", path.display()))?
    };

    Ok(config)
}

/// Merges the config file (if there is one) with the command line, the
/// command line wins.
pub fn load_config(args: &mut Args) -> Result<Config> {
    if !args.config_path.exists() {
        // If there is not config file return only config parsed from clap
        return Ok(Config::from(&mut args.config));
    }

    let contents = fs::read_to_string(&args.config_path)
        .with_context(|| format!("can't read {}", args.config_path.display()))?;
    let config = parse_config_file(&args.config_path, &contents)?;

    Ok(Config::from(config).merge(&mut args.config))
}
