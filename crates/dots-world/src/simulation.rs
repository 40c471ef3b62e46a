//! Frame engine: advances a world one discrete step at a time.

use crate::agent::{Agent, Reproduction};
use crate::snapshot::Snapshot;
use crate::surface::{Glyph, Surface};
use crate::world::{IdSource, World};
use dots_core::{
    Bounds, Error, FrameStats, Result, SimConfig, Species, SpeciesConfig, SpeciesEvents,
    SpeciesSummary,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, event, info, instrument, trace, Level};

pub struct Simulation {
    world: World,
    config: SimConfig,
    rng: ChaCha8Rng,
    frame: u64,
    totals: FrameStats,
    metrics_interval: u64,
}

impl Simulation {
    /// Seed a fresh world from the configuration
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let world = World::populate(&config, &mut rng);

        info!(
            seed = config.seed,
            prey = world.prey.len(),
            predators = world.predators.len(),
            food = world.food.len(),
            "Simulation created"
        );

        Ok(Self::assemble(world, config, rng))
    }

    /// Run the rules of `config` over a hand-built world. The world's bounds
    /// must be the ones `config` describes.
    pub fn with_world(config: SimConfig, world: World) -> Result<Self> {
        config.validate()?;
        check_bounds(&config, &world)?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(Self::assemble(world, config, rng))
    }

    fn assemble(world: World, config: SimConfig, rng: ChaCha8Rng) -> Self {
        Self {
            world,
            config,
            rng,
            frame: 0,
            totals: FrameStats::new(),
            metrics_interval: 0,
        }
    }

    /// Emit population metrics every `frames` frames (0 disables)
    pub fn with_metrics_interval(mut self, frames: u64) -> Self {
        self.metrics_interval = frames;
        self
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Frames completed so far
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Events accumulated over every frame so far
    pub fn totals(&self) -> &FrameStats {
        &self.totals
    }

    pub fn is_extinct(&self) -> bool {
        self.world.population() == 0
    }

    /// Advance the world by exactly one frame: prey, then predators, then food
    pub fn frame<S: Surface + ?Sized>(&mut self, surface: &mut S) -> FrameStats {
        surface.clear();

        let mut stats = FrameStats::new();
        stats.prey = prey_phase(
            &mut self.world,
            &self.config.prey,
            &mut self.rng,
            surface,
            self.frame,
        );
        stats.predator = predator_phase(
            &mut self.world,
            &self.config.predator,
            &mut self.rng,
            surface,
            self.frame,
        );

        for point in self.world.food.iter() {
            Glyph::FOOD.draw(surface, *point);
        }
        surface.present();

        self.totals.absorb(&stats);
        self.frame += 1;

        if self.metrics_interval > 0 && self.frame % self.metrics_interval == 0 {
            self.emit_population_metrics();
        }

        stats
    }

    /// Run a fixed number of frames as fast as possible
    #[instrument(skip(self, surface))]
    pub fn run<S: Surface + ?Sized>(&mut self, frames: u64, surface: &mut S) -> FrameStats {
        let mut stats = FrameStats::new();
        for _ in 0..frames {
            stats.absorb(&self.frame(surface));
        }
        stats
    }

    /// Emit a population snapshot
    pub fn emit_population_metrics(&self) {
        let prey = self.world.summary(Species::Prey);
        let predators = self.world.summary(Species::Predator);

        info!(
            event = "population_metrics",
            frame = self.frame,
            prey = prey.count,
            predators = predators.count,
            food = self.world.food.len(),
            prey_avg_energy = prey.avg_energy,
            prey_avg_speed = prey.avg_speed,
            prey_avg_vision = prey.avg_vision,
            prey_max_generation = prey.max_generation,
            predator_avg_energy = predators.avg_energy,
            predator_avg_speed = predators.avg_speed,
            predator_avg_vision = predators.avg_vision,
            predator_max_generation = predators.max_generation,
            prey_births = self.totals.prey.births,
            prey_killed = self.totals.prey_killed(),
            prey_starved = self.totals.prey.deaths,
            predator_births = self.totals.predator.births,
            predator_starved = self.totals.predator.deaths,
            "Population metrics snapshot"
        );

        event!(
            Level::INFO,
            gauge_name = "population_prey",
            gauge_value = prey.count,
            frame = self.frame,
            "Prey population gauge"
        );

        event!(
            Level::INFO,
            gauge_name = "population_predators",
            gauge_value = predators.count,
            frame = self.frame,
            "Predator population gauge"
        );
    }

    /// Emit the end-of-run summary
    pub fn emit_run_summary(&self) {
        let (prey, predators) = self.summaries();
        let totals = &self.totals;

        info!(
            event = "run_summary",
            frames = self.frame,
            prey_final = prey.count,
            predators_final = predators.count,
            prey_births_total = totals.prey.births,
            prey_meals_total = totals.prey.meals,
            prey_killed_total = totals.prey_killed(),
            prey_starved_total = totals.prey.deaths,
            prey_denied_total = totals.prey.denied,
            predator_births_total = totals.predator.births,
            predator_starved_total = totals.predator.deaths,
            predator_denied_total = totals.predator.denied,
            prey_max_generation = prey.max_generation,
            predator_max_generation = predators.max_generation,
            "Run complete"
        );

        if self.is_extinct() {
            info!(event = "extinction", frame = self.frame, "Every agent has died");
        }
    }

    pub fn summaries(&self) -> (SpeciesSummary, SpeciesSummary) {
        (
            self.world.summary(Species::Prey),
            self.world.summary(Species::Predator),
        )
    }

    /// Capture everything needed to resume this run exactly
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            config: self.config.clone(),
            world: self.world.clone(),
            rng: self.rng.clone(),
            frame: self.frame,
            totals: self.totals,
        }
    }

    /// Resume a run from a snapshot
    pub fn restore(snapshot: Snapshot) -> Result<Self> {
        snapshot.config.validate()?;
        check_bounds(&snapshot.config, &snapshot.world)?;
        debug!(frame = snapshot.frame, "Restoring simulation from snapshot");
        Ok(Self {
            world: snapshot.world,
            config: snapshot.config,
            rng: snapshot.rng,
            frame: snapshot.frame,
            totals: snapshot.totals,
            metrics_interval: 0,
        })
    }
}

fn check_bounds(config: &SimConfig, world: &World) -> Result<()> {
    let expected = Bounds::new(config.world.width, config.world.height);
    if world.bounds != expected {
        return Err(Error::Validation(format!(
            "world bounds {}x{} differ from configured {}x{}",
            world.bounds.width, world.bounds.height, expected.width, expected.height
        )));
    }
    Ok(())
}

/// Prey move towards food, live, breed, and eat. Offspring join the
/// collection after the pass; starved prey leave it at the end.
fn prey_phase<S: Surface + ?Sized>(
    world: &mut World,
    rules: &SpeciesConfig,
    rng: &mut ChaCha8Rng,
    surface: &mut S,
    frame: u64,
) -> SpeciesEvents {
    let World {
        bounds,
        prey,
        food,
        ids,
        ..
    } = world;
    let bounds = *bounds;
    let mut events = SpeciesEvents::default();
    let mut newborns = Vec::new();

    for agent in prey.iter_mut() {
        agent.seek(food.iter().copied(), bounds, rng);
        agent.metabolize(rules);
        live_cycle(agent, Species::Prey, rules, ids, bounds, rng, frame, &mut events, &mut newborns);
        Glyph::for_species(Species::Prey).draw(surface, agent.position);

        let eaten = food.consume_within(agent.position, rules.capture_radius, bounds, rng);
        if eaten > 0 {
            agent.feed(eaten, rules);
            events.meals += eaten as u64;
        }
    }

    events.births = newborns.len() as u64;
    prey.extend(newborns);
    events.deaths = remove_dead(prey, Species::Prey, frame);
    events
}

/// Predators move towards prey, live, breed, and kill. A kill removes the
/// prey before the next predator acts.
fn predator_phase<S: Surface + ?Sized>(
    world: &mut World,
    rules: &SpeciesConfig,
    rng: &mut ChaCha8Rng,
    surface: &mut S,
    frame: u64,
) -> SpeciesEvents {
    let World {
        bounds,
        prey,
        predators,
        ids,
        ..
    } = world;
    let bounds = *bounds;
    let mut events = SpeciesEvents::default();
    let mut newborns = Vec::new();

    for hunter in predators.iter_mut() {
        hunter.seek(prey.iter().map(|p| p.position), bounds, rng);
        hunter.metabolize(rules);
        live_cycle(hunter, Species::Predator, rules, ids, bounds, rng, frame, &mut events, &mut newborns);
        Glyph::for_species(Species::Predator).draw(surface, hunter.position);

        let center = hunter.position;
        let before = prey.len();
        prey.retain(|victim| victim.position.distance(&center) >= rules.capture_radius);
        let kills = before - prey.len();

        if kills > 0 {
            hunter.feed(kills as u32, rules);
            events.meals += kills as u64;
            trace!(
                event = "kill",
                predator_id = %hunter.id,
                kills = kills,
                energy = hunter.energy,
                frame = frame,
                "Predator caught prey"
            );
        }
    }

    events.births = newborns.len() as u64;
    predators.extend(newborns);
    events.deaths = remove_dead(predators, Species::Predator, frame);
    events
}

/// Reproduction attempt followed by the cooldown tick
#[allow(clippy::too_many_arguments)]
fn live_cycle(
    agent: &mut Agent,
    species: Species,
    rules: &SpeciesConfig,
    ids: &mut IdSource,
    bounds: Bounds,
    rng: &mut ChaCha8Rng,
    frame: u64,
    events: &mut SpeciesEvents,
    newborns: &mut Vec<Agent>,
) {
    match agent.reproduce(ids, rules, bounds, rng) {
        Reproduction::Born(child) => {
            debug!(
                event = "birth",
                species = %species,
                parent_id = %agent.id,
                child_id = %child.id,
                generation = child.generation,
                parent_energy = agent.energy,
                child_speed = child.speed,
                child_vision = child.vision,
                frame = frame,
                "Agent reproduced"
            );
            newborns.push(child);
        }
        Reproduction::Denied => {
            events.denied += 1;
            trace!(
                event = "reproduction_denied",
                species = %species,
                agent_id = %agent.id,
                energy = agent.energy,
                threshold = rules.reproduce_threshold,
                frame = frame,
                "Reproduction failed: below inner energy threshold"
            );
        }
        Reproduction::NotReady => {}
    }
    agent.tick_cooldown();
}

fn remove_dead(agents: &mut Vec<Agent>, species: Species, frame: u64) -> u64 {
    let before = agents.len();
    agents.retain(|agent| {
        if agent.is_alive() {
            return true;
        }
        debug!(
            event = "agent_death",
            species = %species,
            agent_id = %agent.id,
            age = agent.age,
            generation = agent.generation,
            offspring = agent.offspring,
            meals = agent.meals,
            frame = frame,
            "Agent starved"
        );
        false
    });
    (before - agents.len()) as u64
}
