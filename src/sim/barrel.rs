//! Falling barrels
//!
//! Barrels drop straight down from above the arena to a pre-rolled landing
//! height and sit there as obstacles. The plain kind just soaks hits; the
//! explosive kind detonates when its hit points run out: area damage is
//! applied exactly once by the collision pass, while the entity itself
//! lingers for a short cosmetic countdown before removal.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{BarrelConfig, GameConfig};
use crate::draw::{Canvas, GRAY, ORANGE, WHITE};
use crate::sim::UpdateCtx;
use crate::sim::collision::Aabb;
use crate::sprite::{Frame, Mask};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarrelKind {
    Plain,
    Explosive,
}

/// Explosion state for a detonated explosive barrel.
#[derive(Debug, Clone)]
pub struct Explosion {
    /// Cosmetic countdown until the entity is removed
    pub timer: f32,
    pub duration: f32,
    pub radius: f32,
    /// Set once the collision pass has dealt the area damage
    pub applied: bool,
}

/// What a hit did to the barrel; the world maps this to score/sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Still standing, cosmetic damage only
    Damaged,
    /// Plain barrel destroyed outright
    Destroyed,
    /// Explosive barrel started its detonation
    Detonated,
    /// Already exploding or gone; nothing happened
    Ignored,
}

#[derive(Debug, Clone)]
pub struct Barrel {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Landing height; the barrel falls until it reaches it
    pub target_y: f32,
    pub landed: bool,
    pub hp: i32,
    pub kind: BarrelKind,
    /// Cosmetic: the host tints damaged barrels
    pub damaged: bool,
    pub radius: f32,
    pub explosion: Option<Explosion>,
    pub alive: bool,
    pub mask: Option<Mask>,
}

impl Barrel {
    pub fn new(x: f32, target_y: f32, cfg: &GameConfig, rng: &mut impl Rng, frame: Option<&Frame>) -> Self {
        let kind = if rng.random_bool(cfg.barrel.explosive_chance) {
            BarrelKind::Explosive
        } else {
            BarrelKind::Plain
        };
        let (radius, mask) = match frame {
            Some(f) => (
                f.collision_radius(cfg.barrel.pixel_scale, cfg.barrel.radius, cfg.min_radius)
                    .max(cfg.barrel.radius),
                Mask::from_frame(f, cfg.barrel.pixel_scale),
            ),
            None => (cfg.barrel.radius.max(cfg.min_radius), None),
        };
        Self {
            pos: Vec2::new(x, -10.0),
            vel: Vec2::new(0.0, cfg.barrel.fall_speed),
            target_y,
            landed: false,
            hp: cfg.barrel.hp,
            kind,
            damaged: false,
            radius,
            explosion: None,
            alive: true,
            mask,
        }
    }

    pub fn update(&mut self, ctx: &UpdateCtx) {
        if !self.landed {
            self.pos += self.vel * ctx.dt;
            if self.pos.y >= self.target_y {
                self.pos.y = self.target_y;
                self.vel = Vec2::ZERO;
                self.landed = true;
            }
        }
        if let Some(ex) = &mut self.explosion {
            ex.timer = (ex.timer - ctx.dt).max(0.0);
            if ex.timer <= 0.0 {
                self.alive = false;
            }
        }
    }

    /// Take one hit. Explosive kinds detonate at zero HP instead of
    /// disappearing; a barrel already exploding ignores further hits.
    pub fn hit(&mut self, cfg: &BarrelConfig) -> HitOutcome {
        if !self.alive || self.explosion.is_some() {
            return HitOutcome::Ignored;
        }
        self.hp -= 1;
        if self.hp > 0 {
            self.damaged = true;
            return HitOutcome::Damaged;
        }
        match self.kind {
            BarrelKind::Explosive => {
                self.explosion = Some(Explosion {
                    timer: cfg.explosion_time,
                    duration: cfg.explosion_time,
                    radius: cfg.explosion_radius,
                    applied: false,
                });
                self.vel = Vec2::ZERO;
                self.landed = true;
                HitOutcome::Detonated
            }
            BarrelKind::Plain => {
                self.alive = false;
                HitOutcome::Destroyed
            }
        }
    }

    /// Axis-aligned bounds for the SAT test, sized from the mask when one
    /// exists, otherwise a square of the collision radius.
    pub fn bounds(&self) -> Aabb {
        let half = match &self.mask {
            Some(m) => Vec2::new(m.width() as f32, m.height() as f32) / 2.0,
            None => Vec2::splat(self.radius),
        };
        Aabb {
            min: self.pos - half,
            max: self.pos + half,
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        if let Some(ex) = &self.explosion {
            // Ring grows over the cosmetic countdown
            let t = 1.0 - (ex.timer / ex.duration).clamp(0.0, 1.0);
            canvas.circle(self.pos, ex.radius * (0.3 + 0.7 * t), ORANGE);
            return;
        }
        let b = self.bounds();
        let pts = [
            b.min,
            Vec2::new(b.max.x, b.min.y),
            b.max,
            Vec2::new(b.min.x, b.max.y),
        ];
        canvas.polygon(&pts, if self.damaged { GRAY } else { WHITE });
    }
}

impl crate::sim::collision::Maskable for Barrel {
    fn collision_mask(&self) -> Option<&Mask> {
        self.mask.as_ref()
    }

    fn center(&self) -> Vec2 {
        self.pos
    }
}
