//! Agent state shared by prey and predators.

use crate::targeting::{advance, nearest_within};
use crate::world::{random_point, IdSource};
use dots_core::{AgentId, Bounds, Point, SpeciesConfig};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Offspring never get slower than this
pub const MIN_SPEED: f32 = 0.1;
/// Offspring never see less than this
pub const MIN_VISION: f32 = 1.0;

/// A prey or predator. Which one is decided by the collection it lives in
/// and the [`SpeciesConfig`] it is updated with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub parent: Option<AgentId>,
    pub generation: u32,
    pub position: Point,
    pub speed: f32,
    pub vision: f32,
    pub energy: f32,
    /// Frames left before the agent may reproduce again
    pub cooldown: u32,
    /// Frames lived
    pub age: u64,
    pub offspring: u32,
    /// Food eaten or prey killed
    pub meals: u32,
}

/// Outcome of a reproduction attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Reproduction {
    /// Outer gate closed: not enough energy or still cooling down
    NotReady,
    /// Outer gate passed but the energy was below the inner threshold
    Denied,
    Born(Agent),
}

impl Agent {
    pub fn new(id: AgentId, position: Point, speed: f32, vision: f32, energy: f32) -> Self {
        Self {
            id,
            parent: None,
            generation: 0,
            position,
            speed,
            vision,
            energy,
            cooldown: 0,
            age: 0,
            offspring: 0,
            meals: 0,
        }
    }

    /// Create a first-generation agent at a random position
    pub fn seeded<R: Rng + ?Sized>(
        id: AgentId,
        rules: &SpeciesConfig,
        bounds: Bounds,
        rng: &mut R,
    ) -> Self {
        let position = random_point(bounds, rng);
        let speed = rng.gen_range(rules.speed_range.min..=rules.speed_range.max);
        let vision = rng.gen_range(rules.vision_range.min..=rules.vision_range.max);
        Self::new(id, position, speed, vision, rules.initial_energy)
    }

    pub fn is_alive(&self) -> bool {
        self.energy > 0.0
    }

    /// Move towards the nearest visible target, or wander when none is in
    /// sight. Returns the target that was chased.
    pub fn seek<I, R>(&mut self, targets: I, bounds: Bounds, rng: &mut R) -> Option<Point>
    where
        I: IntoIterator<Item = Point>,
        R: Rng + ?Sized,
    {
        let target = nearest_within(self.position, self.vision, targets);
        self.position = advance(self.position, self.speed, target, bounds, rng);
        target
    }

    /// Burn one frame's worth of energy
    pub fn metabolize(&mut self, rules: &SpeciesConfig) {
        self.energy -= rules.energy_decay;
        self.age += 1;
    }

    pub fn feed(&mut self, meals: u32, rules: &SpeciesConfig) {
        self.energy += meals as f32 * rules.energy_per_meal;
        self.meals += meals;
    }

    /// Outer reproduction gate
    pub fn ready_to_reproduce(&self, rules: &SpeciesConfig) -> bool {
        self.energy > rules.reproduce_gate && self.cooldown == 0
    }

    /// Two-gate reproduction. Only the inner gate charges the parent and
    /// starts the cooldown.
    pub fn reproduce<R: Rng + ?Sized>(
        &mut self,
        ids: &mut IdSource,
        rules: &SpeciesConfig,
        bounds: Bounds,
        rng: &mut R,
    ) -> Reproduction {
        if !self.ready_to_reproduce(rules) {
            return Reproduction::NotReady;
        }
        if self.energy <= rules.reproduce_threshold {
            return Reproduction::Denied;
        }

        self.energy -= rules.reproduce_cost;
        self.cooldown = rules.cooldown_frames;
        self.offspring += 1;

        let speed = (self.speed + jitter(rng, rules.speed_jitter)).max(MIN_SPEED);
        let vision = (self.vision + jitter(rng, rules.vision_jitter)).max(MIN_VISION);
        let position = bounds.clamp(self.position.add(
            jitter(rng, rules.spawn_offset),
            jitter(rng, rules.spawn_offset),
        ));

        let mut child = Agent::new(ids.next_id(), position, speed, vision, rules.initial_energy);
        child.parent = Some(self.id);
        child.generation = self.generation + 1;
        Reproduction::Born(child)
    }

    pub fn tick_cooldown(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
    }
}

fn jitter<R: Rng + ?Sized>(rng: &mut R, amount: f32) -> f32 {
    if amount > 0.0 {
        rng.gen_range(-amount..=amount)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn bounds() -> Bounds {
        Bounds::new(800.0, 600.0)
    }

    fn prey_at(energy: f32) -> Agent {
        Agent::new(AgentId(1), Point::new(400.0, 300.0), 2.0, 50.0, energy)
    }

    #[test]
    fn test_seeded_agent_within_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let rules = SpeciesConfig::prey();

        for i in 0..50 {
            let agent = Agent::seeded(AgentId(i), &rules, bounds(), &mut rng);
            assert!(bounds().contains(&agent.position));
            assert!(agent.speed >= rules.speed_range.min && agent.speed <= rules.speed_range.max);
            assert!(agent.vision >= rules.vision_range.min && agent.vision <= rules.vision_range.max);
            assert_eq!(agent.energy, rules.initial_energy);
            assert_eq!(agent.cooldown, 0);
        }
    }

    #[test]
    fn test_metabolize_and_death() {
        let rules = SpeciesConfig::predator();
        let mut agent = prey_at(0.3);

        agent.metabolize(&rules);
        assert!((agent.energy - 0.1).abs() < 1e-6);
        assert!(agent.is_alive());
        assert_eq!(agent.age, 1);

        agent.metabolize(&rules);
        assert!(!agent.is_alive());
    }

    #[test]
    fn test_zero_energy_is_dead() {
        assert!(!prey_at(0.0).is_alive());
        assert!(prey_at(0.01).is_alive());
    }

    #[test]
    fn test_reproduction_outer_gate() {
        let rules = SpeciesConfig::prey();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut ids = IdSource::starting_at(10);

        // Exactly at the gate is not enough
        let mut agent = prey_at(150.0);
        assert_eq!(agent.reproduce(&mut ids, &rules, bounds(), &mut rng), Reproduction::NotReady);

        // Cooling down
        let mut agent = prey_at(500.0);
        agent.cooldown = 1;
        assert_eq!(agent.reproduce(&mut ids, &rules, bounds(), &mut rng), Reproduction::NotReady);
        assert_eq!(agent.energy, 500.0);
    }

    #[test]
    fn test_reproduction_inner_gate_denies() {
        let rules = SpeciesConfig::prey();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut ids = IdSource::starting_at(10);

        let mut agent = prey_at(180.0);
        assert_eq!(agent.reproduce(&mut ids, &rules, bounds(), &mut rng), Reproduction::Denied);
        assert_eq!(agent.energy, 180.0);
        assert_eq!(agent.cooldown, 0);
        assert_eq!(agent.offspring, 0);

        let mut agent = prey_at(200.0);
        assert_eq!(agent.reproduce(&mut ids, &rules, bounds(), &mut rng), Reproduction::Denied);
    }

    #[test]
    fn test_reproduction_success() {
        let rules = SpeciesConfig::predator();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut ids = IdSource::starting_at(10);

        let mut parent = prey_at(260.0);
        parent.generation = 2;
        let child = match parent.reproduce(&mut ids, &rules, bounds(), &mut rng) {
            Reproduction::Born(child) => child,
            other => panic!("expected offspring, got {:?}", other),
        };

        assert_eq!(parent.energy, 260.0 - rules.reproduce_cost);
        assert_eq!(parent.cooldown, rules.cooldown_frames);
        assert_eq!(parent.offspring, 1);

        assert_eq!(child.id, AgentId(10));
        assert_eq!(child.parent, Some(parent.id));
        assert_eq!(child.generation, 3);
        assert_eq!(child.energy, rules.initial_energy);
        assert_eq!(child.cooldown, 0);
        assert!((child.speed - parent.speed).abs() <= rules.speed_jitter);
        assert!((child.vision - parent.vision).abs() <= rules.vision_jitter);
        assert!((child.position.x - parent.position.x).abs() <= rules.spawn_offset);
        assert!((child.position.y - parent.position.y).abs() <= rules.spawn_offset);
    }

    #[test]
    fn test_offspring_near_edge_stays_in_bounds() {
        let rules = SpeciesConfig::prey();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut ids = IdSource::starting_at(0);

        for _ in 0..100 {
            let mut parent = Agent::new(AgentId(99), Point::new(0.0, 600.0), 0.1, 1.0, 250.0);
            if let Reproduction::Born(child) = parent.reproduce(&mut ids, &rules, bounds(), &mut rng) {
                assert!(bounds().contains(&child.position));
                assert!(child.speed >= MIN_SPEED);
                assert!(child.vision >= MIN_VISION);
            } else {
                panic!("parent above both gates must reproduce");
            }
        }
    }

    #[test]
    fn test_cooldown_never_underflows() {
        let mut agent = prey_at(10.0);
        agent.cooldown = 2;
        agent.tick_cooldown();
        agent.tick_cooldown();
        agent.tick_cooldown();
        assert_eq!(agent.cooldown, 0);
    }

    #[test]
    fn test_feed() {
        let rules = SpeciesConfig::prey();
        let mut agent = prey_at(10.0);
        agent.feed(2, &rules);
        assert_eq!(agent.energy, 110.0);
        assert_eq!(agent.meals, 2);
    }
}
