//! Asteroid Arena - simulation core for a toroidal-arena arcade shooter
//!
//! Core modules:
//! - `sim`: the simulation (entities, collisions, spawning, world tick)
//! - `config`: immutable tuning passed into `World` at construction
//! - `geom`: 2D vector helpers and toroidal wrapping
//! - `sprite`: collaborator-supplied visual extents and collision masks
//! - `draw`: the opaque drawing surface entities render through
//!
//! The crate owns no I/O: input arrives as a per-tick snapshot, rendering
//! goes through the `Canvas` trait, and sound moments are drained from the
//! world's event queue by the host.

pub mod config;
pub mod draw;
pub mod geom;
pub mod sim;
pub mod sprite;

pub use config::GameConfig;
pub use draw::Canvas;
pub use sim::{GameEvent, TickInput, World};
