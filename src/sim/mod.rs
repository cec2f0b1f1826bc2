//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and
//! deterministic: fixed timestep only, one seeded RNG, no rendering or
//! platform dependencies beyond the [`crate::draw::Canvas`] trait.

use glam::Vec2;

pub mod asteroid;
pub mod barrel;
pub mod collision;
pub mod projectile;
pub mod ship;
pub mod spawn;
pub mod ufo;
pub mod world;

pub use asteroid::{Asteroid, SizeClass};
pub use barrel::{Barrel, BarrelKind, Explosion, HitOutcome};
pub use collision::{Aabb, Maskable, circles_overlap, polygon_aabb_mtv, swept_circle_hit};
pub use projectile::Projectile;
pub use ship::{Facing, Ship};
pub use spawn::{SpawnBatch, SpawnDirector, difficulty};
pub use ufo::{Ufo, UfoKind};
pub use world::{GameEvent, TickInput, World};

/// Per-tick context handed to every entity's `update`, so they all share
/// one signature regardless of what they actually read.
#[derive(Debug, Clone, Copy)]
pub struct UpdateCtx {
    /// Timestep in seconds
    pub dt: f32,
    /// Arena dimensions; positions wrap into `[0, arena)`
    pub arena: Vec2,
    /// The ship's position this tick, for entities that track it
    pub ship_pos: Vec2,
}
