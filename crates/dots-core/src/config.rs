//! Configuration types for the simulation.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Values sampled symmetrically as `[-x, x]` need a finite span
fn check_span(name: &str, value: f32) -> Result<()> {
    if !(2.0 * value).is_finite() {
        return Err(Error::Validation(format!(
            "{name} is too large to sample around, got {value}"
        )));
    }
    Ok(())
}

/// Inclusive range a trait is sampled from when an agent is seeded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(Error::Validation(format!("{name} range must be finite")));
        }
        if self.min < 0.0 || self.min > self.max {
            return Err(Error::Validation(format!(
                "{name} range [{}, {}] must satisfy 0 <= min <= max",
                self.min, self.max
            )));
        }
        check_span(name, self.max)
    }
}

/// Per-species constants shared by the single agent record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesConfig {
    /// Number of agents created at simulation start
    pub initial_count: usize,
    /// Energy of a freshly created agent (seeded or newborn)
    pub initial_energy: f32,
    /// Energy burned every frame
    pub energy_decay: f32,
    /// Distance below which food is eaten / prey is killed
    pub capture_radius: f32,
    /// Energy gained per food eaten / prey killed
    pub energy_per_meal: f32,
    /// Outer gate: energy must exceed this (with cooldown at zero) to attempt reproduction
    pub reproduce_gate: f32,
    /// Inner gate: energy must exceed this for an attempt to produce offspring
    pub reproduce_threshold: f32,
    /// Energy the parent pays per offspring
    pub reproduce_cost: f32,
    /// Frames before the parent may reproduce again
    pub cooldown_frames: u32,
    /// Speed of seeded agents
    pub speed_range: ValueRange,
    /// Vision radius of seeded agents
    pub vision_range: ValueRange,
    /// Maximum change of an offspring's speed relative to its parent
    pub speed_jitter: f32,
    /// Maximum change of an offspring's vision relative to its parent
    pub vision_jitter: f32,
    /// Maximum per-axis distance between parent and offspring
    pub spawn_offset: f32,
}

impl SpeciesConfig {
    pub fn prey() -> Self {
        Self {
            initial_count: 60,
            initial_energy: 100.0,
            energy_decay: 0.1,
            capture_radius: 10.0,
            energy_per_meal: 50.0,
            reproduce_gate: 150.0,
            reproduce_threshold: 200.0,
            reproduce_cost: 100.0,
            cooldown_frames: 60,
            speed_range: ValueRange::new(1.0, 3.0),
            vision_range: ValueRange::new(40.0, 80.0),
            speed_jitter: 0.5,
            vision_jitter: 5.0,
            spawn_offset: 10.0,
        }
    }

    pub fn predator() -> Self {
        Self {
            initial_count: 8,
            initial_energy: 150.0,
            energy_decay: 0.2,
            capture_radius: 10.0,
            energy_per_meal: 60.0,
            reproduce_gate: 200.0,
            reproduce_threshold: 250.0,
            reproduce_cost: 120.0,
            cooldown_frames: 90,
            speed_range: ValueRange::new(1.5, 3.5),
            vision_range: ValueRange::new(60.0, 100.0),
            speed_jitter: 0.5,
            vision_jitter: 5.0,
            spawn_offset: 10.0,
        }
    }

    pub fn validate(&self, name: &str) -> Result<()> {
        let scalars = [
            ("initial_energy", self.initial_energy),
            ("energy_decay", self.energy_decay),
            ("capture_radius", self.capture_radius),
            ("energy_per_meal", self.energy_per_meal),
            ("reproduce_gate", self.reproduce_gate),
            ("reproduce_threshold", self.reproduce_threshold),
            ("reproduce_cost", self.reproduce_cost),
            ("speed_jitter", self.speed_jitter),
            ("vision_jitter", self.vision_jitter),
            ("spawn_offset", self.spawn_offset),
        ];
        for (field, value) in scalars {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Validation(format!(
                    "{name}.{field} must be finite and non-negative, got {value}"
                )));
            }
        }
        for (field, value) in [
            ("speed_jitter", self.speed_jitter),
            ("vision_jitter", self.vision_jitter),
            ("spawn_offset", self.spawn_offset),
        ] {
            check_span(&format!("{name}.{field}"), value)?;
        }
        self.speed_range.validate(&format!("{name}.speed"))?;
        self.vision_range.validate(&format!("{name}.vision"))?;
        Ok(())
    }
}

/// World configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the world
    pub width: f32,
    /// Height of the world
    pub height: f32,
    /// Number of food points, constant for the whole run
    pub food_count: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            food_count: 100,
        }
    }
}

/// Everything needed to build a reproducible simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    pub world: WorldConfig,
    #[serde(default = "SpeciesConfig::prey")]
    pub prey: SpeciesConfig,
    #[serde(default = "SpeciesConfig::predator")]
    pub predator: SpeciesConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            world: WorldConfig::default(),
            prey: SpeciesConfig::prey(),
            predator: SpeciesConfig::predator(),
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        let (w, h) = (self.world.width, self.world.height);
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(Error::Validation(format!(
                "world bounds must be positive, got {w}x{h}"
            )));
        }
        self.prey.validate("prey")?;
        self.predator.validate("predator")?;
        Ok(())
    }
}

/// Periodic checkpoint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointConfig {
    /// Directory checkpoint files are written to
    pub dir: String,
    /// Frames between checkpoints (0 disables checkpointing)
    pub interval_frames: u64,
    /// Number of newest checkpoints kept on disk
    pub keep: usize,
    /// Resume from the newest checkpoint at start-up
    pub restore_latest: bool,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            dir: "./data/checkpoints".to_string(),
            interval_frames: 0,
            keep: 5,
            restore_latest: false,
        }
    }
}

/// Runner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Target frames per second
    pub fps: u32,
    /// Stop after this many frames (runs until quit when unset)
    pub max_frames: Option<u64>,
    /// Frames between population metric snapshots
    pub metrics_interval: u64,
    pub checkpoint: CheckpointConfig,
    pub sim: SimConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            fps: 24,
            max_frames: None,
            metrics_interval: 240, // 10 seconds at 24 fps
            checkpoint: CheckpointConfig::default(),
            sim: SimConfig::default(),
        }
    }
}

impl RunnerConfig {
    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        tracing::debug!(path = %path.display(), "Loaded runner config");
        Ok(config)
    }

    /// Parse and validate a JSON config. Omitted fields keep their defaults
    /// at every level; a partial `prey` or `predator` object is laid over
    /// that species' preset.
    pub fn from_json(text: &str) -> Result<Self> {
        let mut value: Value = serde_json::from_str(text)?;
        if let Some(sim) = value.get_mut("sim") {
            fill_species(sim, "prey", SpeciesConfig::prey())?;
            fill_species(sim, "predator", SpeciesConfig::predator())?;
        }
        let config: RunnerConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(Error::Validation("fps must be at least 1".to_string()));
        }
        if self.checkpoint.interval_frames > 0 && self.checkpoint.keep == 0 {
            return Err(Error::Validation(
                "checkpoint.keep must be at least 1 when checkpointing is enabled".to_string(),
            ));
        }
        self.sim.validate()
    }
}

fn fill_species(sim: &mut Value, key: &str, preset: SpeciesConfig) -> Result<()> {
    if let Some(Value::Object(overrides)) = sim.get_mut(key) {
        if let Value::Object(mut fields) = serde_json::to_value(preset)? {
            fields.extend(std::mem::take(overrides));
            *overrides = fields;
        }
    }
    Ok(())
}
