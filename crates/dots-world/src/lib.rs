//! Predator / prey / food world simulation.
//!
//! Prey chase the nearest visible food, predators chase the nearest visible
//! prey, both burn energy every frame, breed above an energy threshold, and
//! starve when their energy runs out.

pub mod agent;
pub mod food;
pub mod simulation;
pub mod snapshot;
pub mod surface;
pub mod targeting;
pub mod world;

pub use agent::{Agent, Reproduction};
pub use food::FoodField;
pub use simulation::Simulation;
pub use snapshot::Snapshot;
pub use surface::{Glyph, NullSurface, RecordingSurface, Surface};
pub use world::World;
