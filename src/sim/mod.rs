//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Caller-provided `dt`, clamped per tick
//! - Seeded RNG only
//! - Stable iteration order (obstacles sorted by id)
//! - No rendering, audio or storage dependencies

pub mod collision;
pub mod generator;
pub mod physics;
pub mod state;
pub mod store;
pub mod tick;

pub use collision::{
    BoundaryContact, CloudPair, Ellipse, circles_overlap, hits_obstacle, resolve_collisions,
};
pub use generator::{SpawnOutcome, pickup_offsets, spawn_obstacle_pair};
pub use physics::advance;
pub use state::{GameEvent, GamePhase, GameState, Obstacle, ObstacleId, Particle, Pickup, Player};
pub use store::EntityStore;
pub use tick::{Intent, TickInput, autopilot_wants_flap, tick};
