//! Population statistics tracking.

use serde::{Deserialize, Serialize};

/// Events of one species during one or more frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesEvents {
    /// Offspring appended to the collection
    pub births: u64,
    /// Agents removed because their energy ran out
    pub deaths: u64,
    /// Food eaten (prey) or prey killed (predators)
    pub meals: u64,
    /// Attempts that passed the outer gate but not the inner one
    pub denied: u64,
}

impl SpeciesEvents {
    pub fn absorb(&mut self, other: &SpeciesEvents) {
        self.births += other.births;
        self.deaths += other.deaths;
        self.meals += other.meals;
        self.denied += other.denied;
    }
}

/// What happened during a frame (or, accumulated, during a run)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameStats {
    pub prey: SpeciesEvents,
    pub predator: SpeciesEvents,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prey lost to predators
    pub fn prey_killed(&self) -> u64 {
        self.predator.meals
    }

    pub fn absorb(&mut self, other: &FrameStats) {
        self.prey.absorb(&other.prey);
        self.predator.absorb(&other.predator);
    }
}

/// Snapshot of a species' population
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeciesSummary {
    pub count: usize,
    pub avg_energy: f32,
    pub min_energy: f32,
    pub max_energy: f32,
    pub avg_speed: f32,
    pub avg_vision: f32,
    pub max_generation: u32,
}

impl SpeciesSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one agent into the summary
    pub fn observe(&mut self, energy: f32, speed: f32, vision: f32, generation: u32) {
        let n = self.count as f32;
        let new_n = n + 1.0;

        // Incremental mean
        self.avg_energy = (self.avg_energy * n + energy) / new_n;
        self.avg_speed = (self.avg_speed * n + speed) / new_n;
        self.avg_vision = (self.avg_vision * n + vision) / new_n;

        if self.count == 0 {
            self.min_energy = energy;
            self.max_energy = energy;
        } else {
            self.min_energy = self.min_energy.min(energy);
            self.max_energy = self.max_energy.max(energy);
        }
        self.max_generation = self.max_generation.max(generation);

        self.count += 1;
    }
}
