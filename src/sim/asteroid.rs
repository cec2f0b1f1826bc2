//! Asteroids
//!
//! Three size classes with a fixed fragmentation chain: Large splits into
//! two Mediums, Medium into two Smalls, Small into nothing. Each asteroid
//! carries a jittered polygon generated once at creation; the polygon is
//! cosmetic except where the host rasterizes it for masks.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::config::{AsteroidConfig, SizeSpec};
use crate::draw::{Canvas, WHITE};
use crate::geom::wrap_pos;
use crate::sim::UpdateCtx;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeClass {
    Large,
    Medium,
    Small,
}

impl SizeClass {
    pub fn spec(self, cfg: &AsteroidConfig) -> SizeSpec {
        match self {
            SizeClass::Large => cfg.large,
            SizeClass::Medium => cfg.medium,
            SizeClass::Small => cfg.small,
        }
    }

    /// Children produced when an asteroid of this class is destroyed.
    pub fn split(self) -> &'static [SizeClass] {
        match self {
            SizeClass::Large => &[SizeClass::Medium, SizeClass::Medium],
            SizeClass::Medium => &[SizeClass::Small, SizeClass::Small],
            SizeClass::Small => &[],
        }
    }

    fn vertex_count(self) -> usize {
        match self {
            SizeClass::Large => 12,
            SizeClass::Medium => 10,
            SizeClass::Small => 8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: SizeClass,
    pub radius: f32,
    /// Jittered outline, vertices relative to `pos`; fixed at creation
    pub poly: Vec<Vec2>,
    pub alive: bool,
}

impl Asteroid {
    pub fn new(
        pos: Vec2,
        vel: Vec2,
        size: SizeClass,
        cfg: &AsteroidConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let radius = size.spec(cfg).radius;
        let steps = size.vertex_count();
        let poly = (0..steps)
            .map(|i| {
                let ang = i as f32 * TAU / steps as f32;
                let jitter: f32 = rng.random_range(0.75..1.2);
                Vec2::new(ang.cos(), ang.sin()) * radius * jitter
            })
            .collect();
        Self {
            pos,
            vel,
            size,
            radius,
            poly,
            alive: true,
        }
    }

    pub fn update(&mut self, ctx: &UpdateCtx) {
        self.pos += self.vel * ctx.dt;
        self.pos = wrap_pos(self.pos, ctx.arena);
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let pts: Vec<Vec2> = self.poly.iter().map(|p| self.pos + *p).collect();
        canvas.polygon(&pts, WHITE);
    }
}
