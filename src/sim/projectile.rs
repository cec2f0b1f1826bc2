//! Player and enemy projectiles
//!
//! Both kinds share one model: a small fast circle with a lifetime, culled
//! when it leaves the arena (projectiles do not wrap). The previous tick's
//! position is kept so the collision pass can sweep the travel segment
//! instead of tunneling through thin targets.

use glam::Vec2;

use crate::config::BulletConfig;
use crate::draw::{BULLET_PALETTE, Canvas};
use crate::sim::UpdateCtx;

/// Seconds per step of the cosmetic color cycle.
const COLOR_CYCLE_STEP: f32 = 0.04;

#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Seconds since spawn; drives the color cycle and the TTL cull
    pub age: f32,
    pub ttl: f32,
    /// Position at the start of this tick, for swept collision checks
    pub prev_pos: Vec2,
    pub alive: bool,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2, cfg: &BulletConfig) -> Self {
        Self {
            pos,
            vel,
            radius: cfg.radius,
            age: 0.0,
            ttl: cfg.ttl,
            prev_pos: pos,
            alive: true,
        }
    }

    pub fn update(&mut self, ctx: &UpdateCtx) {
        self.prev_pos = self.pos;
        self.pos += self.vel * ctx.dt;
        self.age += ctx.dt;
        let out = self.pos.x < 0.0
            || self.pos.x > ctx.arena.x
            || self.pos.y < 0.0
            || self.pos.y > ctx.arena.y;
        if out || self.age >= self.ttl {
            self.alive = false;
        }
    }

    /// Index into the host's color palette for this projectile's age.
    pub fn color_index(&self, palette_len: usize) -> usize {
        debug_assert!(palette_len > 0);
        (self.age / COLOR_CYCLE_STEP) as usize % palette_len
    }

    /// Draw as a short quad elongated along the velocity direction.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let dir = self.vel.normalize_or_zero();
        let dir = if dir == Vec2::ZERO { Vec2::X } else { dir };
        let perp = dir.perp();
        let half_len = self.radius * 3.0;
        let half_w = self.radius;
        let pts = [
            self.pos - dir * half_len - perp * half_w,
            self.pos - dir * half_len + perp * half_w,
            self.pos + dir * half_len + perp * half_w,
            self.pos + dir * half_len - perp * half_w,
        ];
        let color = BULLET_PALETTE[self.color_index(BULLET_PALETTE.len())];
        canvas.polygon(&pts, color);
    }
}
