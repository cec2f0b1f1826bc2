//! The player's ship

use glam::Vec2;
use rand::Rng;

use crate::config::{BulletConfig, GameConfig, ShipConfig};
use crate::draw::{Canvas, WHITE};
use crate::geom::{normalize_or_random, wrap_pos};
use crate::sim::projectile::Projectile;
use crate::sim::{TickInput, UpdateCtx};
use crate::sprite::{Frame, Mask};

/// Coarse facing bucket derived from the dominant movement axis. The host
/// uses it to pick a directional sprite; the sim itself only stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

/// Sprite animation rate while moving (frames per second).
const ANIM_RATE: f32 = 6.0;

#[derive(Debug, Clone)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading in degrees; tracks the last movement direction
    pub heading: f32,
    /// Seconds until the next shot is allowed
    pub cooldown: f32,
    /// Seconds of remaining invulnerability
    pub invuln: f32,
    /// Seconds of remaining stun; control input is ignored while > 0.
    /// Nothing in the core arms this - combat-mode hosts do.
    pub stun: f32,
    /// Position at the start of this tick, for blocking rollback
    pub prev_pos: Vec2,
    pub radius: f32,
    pub facing: Facing,
    /// Monotonic frame counter for the host's walk animation
    pub anim_frame: u32,
    anim_timer: f32,
    pub mask: Option<Mask>,
}

impl Ship {
    pub fn new(pos: Vec2, cfg: &GameConfig, frame: Option<&Frame>) -> Self {
        let (radius, mask) = match frame {
            Some(f) => (
                f.collision_radius(cfg.ship.pixel_scale, cfg.ship.radius, cfg.min_radius),
                Mask::from_frame(f, cfg.ship.pixel_scale),
            ),
            None => (cfg.ship.radius.max(cfg.min_radius), None),
        };
        Self {
            pos,
            vel: Vec2::ZERO,
            heading: -90.0,
            cooldown: 0.0,
            invuln: 0.0,
            stun: 0.0,
            prev_pos: pos,
            radius,
            facing: Facing::default(),
            anim_frame: 0,
            anim_timer: 0.0,
            mask,
        }
    }

    /// Turn the directional intent into a velocity and a facing bucket.
    pub fn control(&mut self, input: &TickInput, cfg: &ShipConfig) {
        if self.stun > 0.0 {
            self.vel = Vec2::ZERO;
            return;
        }
        let mut mv = Vec2::ZERO;
        if input.up {
            mv.y -= 1.0;
        }
        if input.down {
            mv.y += 1.0;
        }
        if input.left {
            mv.x -= 1.0;
        }
        if input.right {
            mv.x += 1.0;
        }
        if mv != Vec2::ZERO {
            let mv = mv.normalize();
            self.vel = mv * cfg.speed;
            self.heading = mv.y.atan2(mv.x).to_degrees();
            self.facing = if mv.x.abs() > mv.y.abs() {
                if mv.x < 0.0 { Facing::Left } else { Facing::Right }
            } else if mv.y < 0.0 {
                Facing::Up
            } else {
                Facing::Down
            };
        } else {
            self.vel = Vec2::ZERO;
        }
    }

    /// Spawn a bullet toward `aim` if the cooldown allows it. A successful
    /// shot re-arms the cooldown.
    pub fn fire(
        &mut self,
        aim: Option<Vec2>,
        cfg: &ShipConfig,
        bullet: &BulletConfig,
        rng: &mut impl Rng,
    ) -> Option<Projectile> {
        if self.cooldown > 0.0 {
            return None;
        }
        let dir = match aim {
            Some(target) => normalize_or_random(target - self.pos, rng),
            None => crate::geom::angle_to_vec(self.heading),
        };
        let pos = self.pos + dir * (self.radius + 4.0);
        self.cooldown = cfg.fire_rate;
        Some(Projectile::new(pos, dir * bullet.speed, bullet))
    }

    /// Teleport to a random arena position, killing velocity and granting a
    /// short invulnerability window. The caller applies the score penalty.
    pub fn hyperspace(&mut self, cfg: &ShipConfig, arena: Vec2, rng: &mut impl Rng) {
        self.pos = Vec2::new(
            rng.random_range(0.0..arena.x),
            rng.random_range(0.0..arena.y),
        );
        self.vel = Vec2::ZERO;
        self.invuln = cfg.hyperspace_invuln;
    }

    pub fn update(&mut self, ctx: &UpdateCtx) {
        self.cooldown = (self.cooldown - ctx.dt).max(0.0);
        self.invuln = (self.invuln - ctx.dt).max(0.0);
        self.stun = (self.stun - ctx.dt).max(0.0);

        // Walk animation: advance while moving, snap to base when stopped
        if self.vel != Vec2::ZERO {
            self.anim_timer += ctx.dt;
            let frame_duration = 1.0 / ANIM_RATE;
            if self.anim_timer >= frame_duration {
                let steps = (self.anim_timer / frame_duration) as u32;
                self.anim_timer -= steps as f32 * frame_duration;
                self.anim_frame = self.anim_frame.wrapping_add(steps);
            }
        } else {
            self.anim_timer = 0.0;
            self.anim_frame = 0;
        }

        self.prev_pos = self.pos;
        self.pos += self.vel * ctx.dt;
        self.pos = wrap_pos(self.pos, ctx.arena);
    }

    /// Triangular silhouette oriented along the heading, used by the SAT
    /// test against rectangular obstacles.
    pub fn silhouette(&self) -> [Vec2; 3] {
        let dir = crate::geom::angle_to_vec(self.heading);
        let back_l = crate::geom::angle_to_vec(self.heading + 140.0);
        let back_r = crate::geom::angle_to_vec(self.heading - 140.0);
        [
            self.pos + dir * self.radius,
            self.pos + back_l * self.radius,
            self.pos + back_r * self.radius,
        ]
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.polygon(&self.silhouette(), WHITE);
        // Blink a ring while invulnerable
        if self.invuln > 0.0 && (self.invuln * 10.0) as i32 % 2 == 0 {
            canvas.circle(self.pos, self.radius + 6.0, WHITE);
        }
    }
}

impl crate::sim::collision::Maskable for Ship {
    fn collision_mask(&self) -> Option<&Mask> {
        self.mask.as_ref()
    }

    fn center(&self) -> Vec2 {
        self.pos
    }
}
