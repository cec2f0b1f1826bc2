//! Flying saucers
//!
//! UFOs orbit the ship: each tick a desired heading is blended from a
//! tangential (orbit) direction and a radial (approach) direction, then the
//! actual heading is lerped toward it under a per-instance turn-rate cap.
//! The blend weights and turn rate are jittered at spawn so no two UFOs fly
//! alike. Small UFOs are rarer prey: worth more, aim better, fire faster.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{GameConfig, UfoConfig, UfoVariantSpec};
use crate::draw::{Canvas, WHITE};
use crate::geom::wrap_pos;
use crate::sim::projectile::Projectile;
use crate::sim::UpdateCtx;
use crate::sprite::{Frame, Mask};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UfoKind {
    Small,
    Large,
}

impl UfoKind {
    pub fn spec(self, cfg: &UfoConfig) -> UfoVariantSpec {
        match self {
            UfoKind::Small => cfg.small,
            UfoKind::Large => cfg.large,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ufo {
    pub pos: Vec2,
    /// Unit heading; speed is constant
    pub dir: Vec2,
    pub kind: UfoKind,
    pub radius: f32,
    pub speed: f32,
    /// 0 = fires along heading, 1 = fires straight at the ship
    pub aim: f32,
    pub fire_cooldown: f32,
    pub fire_rate: f32,
    /// Cosmetic: how long the "just fired" sprite stays up
    pub shot_display: f32,
    pub alive: bool,
    pub mask: Option<Mask>,
    // Per-instance orbit personality, jittered at spawn
    orbit_tangential: f32,
    orbit_radial: f32,
    orbit_max_turn: f32,
}

impl Ufo {
    pub fn new(pos: Vec2, kind: UfoKind, cfg: &GameConfig, rng: &mut impl Rng, frame: Option<&Frame>) -> Self {
        let spec = kind.spec(&cfg.ufo);
        let var = cfg.ufo.orbit_variance;
        let mut sample = || rng.random_range(-var..=var);
        let mut tangential = (cfg.ufo.orbit_tangential * (1.0 + sample())).max(0.0);
        let mut radial = (cfg.ufo.orbit_radial * (1.0 + sample())).max(0.0);
        let sum = tangential + radial;
        if sum > 0.0 {
            tangential /= sum;
            radial /= sum;
        }
        let max_turn = (cfg.ufo.orbit_max_turn * (1.0 + sample())).max(0.1);

        let dir = if rng.random_bool(0.5) { Vec2::X } else { -Vec2::X };

        let (radius, mask) = match frame {
            Some(f) => (
                f.collision_radius(cfg.ufo.pixel_scale, spec.radius, cfg.min_radius)
                    .max(spec.radius),
                Mask::from_frame(f, cfg.ufo.pixel_scale),
            ),
            None => (spec.radius.max(cfg.min_radius), None),
        };

        Self {
            pos,
            dir,
            kind,
            radius,
            speed: cfg.ufo.speed,
            aim: spec.aim,
            // First shot comes as soon as the world checks the trigger
            fire_cooldown: 0.0,
            fire_rate: spec.fire_rate,
            shot_display: 0.0,
            alive: true,
            mask,
            orbit_tangential: tangential,
            orbit_radial: radial,
            orbit_max_turn: max_turn,
        }
    }

    /// Blend tangential and radial pull into a desired heading and lerp the
    /// current heading toward it, capped by the instance turn rate.
    fn steer(&mut self, dt: f32, ship_pos: Vec2) {
        let to_player = ship_pos - self.pos;
        let radial = if to_player == Vec2::ZERO {
            Vec2::X
        } else {
            to_player.normalize()
        };
        // Keep orbiting in the current winding direction
        let mut tangential = radial.perp();
        if self.dir.dot(tangential) < 0.0 {
            tangential = -tangential;
        }
        let desired = tangential * self.orbit_tangential + radial * self.orbit_radial;
        let desired = if desired == Vec2::ZERO {
            tangential
        } else {
            desired.normalize()
        };
        let lerp = (dt * self.orbit_max_turn).min(1.0);
        self.dir = (self.dir * (1.0 - lerp) + desired * lerp).normalize_or_zero();
        if self.dir == Vec2::ZERO {
            self.dir = desired;
        }
    }

    pub fn update(&mut self, ctx: &UpdateCtx) {
        self.steer(ctx.dt, ctx.ship_pos);
        self.pos += self.dir * self.speed * ctx.dt;
        self.pos = wrap_pos(self.pos, ctx.arena);
        self.fire_cooldown = (self.fire_cooldown - ctx.dt).max(0.0);
        self.shot_display = (self.shot_display - ctx.dt).max(0.0);
    }

    /// Fire at the ship when the cooldown has elapsed. Aim blends the
    /// current heading with the direction to the ship by the variant's
    /// accuracy factor; enemy shots fly slower than the player's.
    pub fn try_fire(
        &mut self,
        ship_pos: Vec2,
        cfg: &GameConfig,
        rng: &mut impl Rng,
    ) -> Option<Projectile> {
        if self.fire_cooldown > 0.0 {
            return None;
        }
        let to_player = crate::geom::normalize_or_random(ship_pos - self.pos, rng);
        let fire_dir = (self.dir * (1.0 - self.aim) + to_player * self.aim).normalize_or_zero();
        let fire_dir = if fire_dir == Vec2::ZERO { to_player } else { fire_dir };
        let vel = fire_dir * cfg.bullet.speed * cfg.ufo.bullet_speed_factor;
        self.fire_cooldown = self.fire_rate;
        self.shot_display = cfg.ufo.shot_display_time;
        Some(Projectile::new(
            self.pos + fire_dir * (self.radius + 6.0),
            vel,
            &cfg.bullet,
        ))
    }

    pub fn score(&self, cfg: &UfoConfig) -> u32 {
        self.kind.spec(cfg).score
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        // Saucer body plus canopy; the host swaps in sprites when it has them
        canvas.circle(self.pos, self.radius, WHITE);
        canvas.circle(self.pos - Vec2::new(0.0, self.radius * 0.4), self.radius * 0.5, WHITE);
    }
}

impl crate::sim::collision::Maskable for Ufo {
    fn collision_mask(&self) -> Option<&Mask> {
        self.mask.as_ref()
    }

    fn center(&self) -> Vec2 {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn cfg() -> GameConfig {
        GameConfig::default()
    }

    #[test]
    fn orbit_weights_are_jittered_and_normalized() {
        let cfg = cfg();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut seen_distinct = false;
        let mut last: Option<f32> = None;
        for _ in 0..16 {
            let u = Ufo::new(Vec2::ZERO, UfoKind::Large, &cfg, &mut rng, None);
            let sum = u.orbit_tangential + u.orbit_radial;
            assert!((sum - 1.0).abs() < 1e-5);
            assert!(u.orbit_max_turn >= 0.1);
            // within +/-variance of base after renormalization the turn rate
            // still sits inside the jitter band
            let lo = cfg.ufo.orbit_max_turn * (1.0 - cfg.ufo.orbit_variance);
            let hi = cfg.ufo.orbit_max_turn * (1.0 + cfg.ufo.orbit_variance);
            assert!(u.orbit_max_turn >= lo - 1e-5 && u.orbit_max_turn <= hi + 1e-5);
            if let Some(prev) = last
                && (u.orbit_max_turn - prev).abs() > 1e-6
            {
                seen_distinct = true;
            }
            last = Some(u.orbit_max_turn);
        }
        assert!(seen_distinct, "every UFO rolled identical parameters");
    }

    #[test]
    fn steering_is_rate_limited() {
        let cfg = cfg();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut u = Ufo::new(Vec2::new(100.0, 100.0), UfoKind::Large, &cfg, &mut rng, None);
        u.dir = Vec2::X;
        let before = u.dir;
        u.steer(0.01, Vec2::new(100.0, 500.0));
        // Tiny dt means a tiny heading change
        let angle = before.angle_to(u.dir).abs();
        assert!(angle < 0.2, "turned {angle} rad in one 10ms step");
        assert!((u.dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn fire_respects_cooldown_and_resets_it() {
        let cfg = cfg();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut u = Ufo::new(Vec2::new(100.0, 100.0), UfoKind::Small, &cfg, &mut rng, None);
        // A fresh saucer shoots on its first trigger check
        let shot = u.try_fire(Vec2::new(500.0, 100.0), &cfg, &mut rng).unwrap();
        assert!(u.try_fire(Vec2::new(500.0, 100.0), &cfg, &mut rng).is_none());
        assert_eq!(u.fire_cooldown, cfg.ufo.small.fire_rate);
        assert_eq!(u.shot_display, cfg.ufo.shot_display_time);
        let expected_speed = cfg.bullet.speed * cfg.ufo.bullet_speed_factor;
        assert!((shot.vel.length() - expected_speed).abs() < 1e-3);
    }

    #[test]
    fn small_ufo_aims_closer_to_the_ship() {
        let cfg = cfg();
        let mut rng = Pcg32::seed_from_u64(11);
        let ship = Vec2::new(500.0, 100.0);
        let mut small = Ufo::new(Vec2::new(100.0, 100.0), UfoKind::Small, &cfg, &mut rng, None);
        let mut large = Ufo::new(Vec2::new(100.0, 100.0), UfoKind::Large, &cfg, &mut rng, None);
        // Same heading, perpendicular to the ship direction
        small.dir = Vec2::Y;
        large.dir = Vec2::Y;
        let to_ship = (ship - Vec2::new(100.0, 100.0)).normalize();
        let s = small.try_fire(ship, &cfg, &mut rng).unwrap();
        let l = large.try_fire(ship, &cfg, &mut rng).unwrap();
        let s_align = s.vel.normalize().dot(to_ship);
        let l_align = l.vel.normalize().dot(to_ship);
        assert!(s_align > l_align, "small {s_align} should out-aim large {l_align}");
    }
}
