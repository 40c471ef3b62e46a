//! World state: the three flat collections and their bounds.

use crate::agent::Agent;
use crate::food::FoodField;
use dots_core::{AgentId, Bounds, Point, SimConfig, Species, SpeciesConfig, SpeciesSummary};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Hands out agent ids, unique within a world
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdSource {
    next: u64,
}

impl IdSource {
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    pub fn next_id(&mut self) -> AgentId {
        let id = AgentId(self.next);
        self.next += 1;
        id
    }
}

/// Uniform random point inside the bounds
pub fn random_point<R: Rng + ?Sized>(bounds: Bounds, rng: &mut R) -> Point {
    Point::new(
        rng.gen_range(0.0..=bounds.width),
        rng.gen_range(0.0..=bounds.height),
    )
}

/// Prey, predators and food. Agents never reference each other; every
/// relationship is found again by scanning these collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub bounds: Bounds,
    pub prey: Vec<Agent>,
    pub predators: Vec<Agent>,
    pub food: FoodField,
    pub ids: IdSource,
}

impl World {
    pub fn empty(bounds: Bounds) -> Self {
        Self {
            bounds,
            prey: Vec::new(),
            predators: Vec::new(),
            food: FoodField::default(),
            ids: IdSource::default(),
        }
    }

    /// Seed a world from configuration
    pub fn populate<R: Rng + ?Sized>(config: &SimConfig, rng: &mut R) -> Self {
        let bounds = Bounds::new(config.world.width, config.world.height);
        let mut world = Self::empty(bounds);

        world.food = FoodField::scatter(config.world.food_count, bounds, rng);
        for _ in 0..config.prey.initial_count {
            let agent = Agent::seeded(world.ids.next_id(), &config.prey, bounds, rng);
            world.prey.push(agent);
        }
        for _ in 0..config.predator.initial_count {
            let agent = Agent::seeded(world.ids.next_id(), &config.predator, bounds, rng);
            world.predators.push(agent);
        }

        world
    }

    /// Place an agent by hand; position is clamped into the bounds
    pub fn spawn(
        &mut self,
        species: Species,
        position: Point,
        speed: f32,
        vision: f32,
        rules: &SpeciesConfig,
    ) -> AgentId {
        let id = self.ids.next_id();
        let agent = Agent::new(id, self.bounds.clamp(position), speed, vision, rules.initial_energy);
        self.agents_mut(species).push(agent);
        id
    }

    pub fn agents(&self, species: Species) -> &[Agent] {
        match species {
            Species::Prey => &self.prey,
            Species::Predator => &self.predators,
        }
    }

    pub fn agents_mut(&mut self, species: Species) -> &mut Vec<Agent> {
        match species {
            Species::Prey => &mut self.prey,
            Species::Predator => &mut self.predators,
        }
    }

    pub fn population(&self) -> usize {
        self.prey.len() + self.predators.len()
    }

    pub fn summary(&self, species: Species) -> SpeciesSummary {
        let mut summary = SpeciesSummary::new();
        for agent in self.agents(species) {
            summary.observe(agent.energy, agent.speed, agent.vision, agent.generation);
        }
        summary
    }
}
