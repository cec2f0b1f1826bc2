//! Spawn director
//!
//! Three independent cadences, all tightened by the difficulty scalar:
//! asteroids drift in from the arena edges, UFOs top up to a concurrency
//! target, and barrels drop from above at a re-rolled random interval.
//! The director only decides *what* to spawn; the world materializes the
//! seeds so entity construction stays in one place.

use glam::Vec2;
use rand::Rng;

use crate::config::GameConfig;
use crate::geom::{rand_edge_pos, rand_unit_vec};
use crate::sim::asteroid::SizeClass;

/// Difficulty scalar: 1.0 at zero score, growing linearly with score.
pub fn difficulty(score: u32, cfg: &GameConfig) -> f32 {
    1.0 + score as f32 / cfg.difficulty_score_scale
}

#[derive(Debug, Clone, Copy)]
pub struct AsteroidSeed {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: SizeClass,
}

#[derive(Debug, Clone, Copy)]
pub struct BarrelSeed {
    pub x: f32,
    pub target_y: f32,
}

/// Everything one director tick decided to spawn.
#[derive(Debug, Default)]
pub struct SpawnBatch {
    pub asteroids: Vec<AsteroidSeed>,
    /// Number of UFOs to add this tick
    pub ufos: u32,
    pub barrel: Option<BarrelSeed>,
}

#[derive(Debug, Clone)]
pub struct SpawnDirector {
    asteroid_timer: f32,
    ufo_timer: f32,
    barrel_elapsed: f32,
    next_barrel: f32,
}

impl SpawnDirector {
    pub fn new(cfg: &GameConfig, rng: &mut impl Rng) -> Self {
        Self {
            asteroid_timer: cfg.asteroid.spawn_interval_base,
            ufo_timer: cfg.ufo.spawn_every,
            barrel_elapsed: 0.0,
            next_barrel: rng
                .random_range(cfg.barrel.spawn_interval_min..cfg.barrel.spawn_interval_max),
        }
    }

    /// Advance all cadences and report what should spawn this tick.
    pub fn tick(
        &mut self,
        dt: f32,
        score: u32,
        ship_pos: Vec2,
        live_ufos: u32,
        cfg: &GameConfig,
        rng: &mut impl Rng,
    ) -> SpawnBatch {
        let diff = difficulty(score, cfg);
        let mut batch = SpawnBatch::default();

        self.asteroid_timer -= dt;
        if self.asteroid_timer <= 0.0 {
            self.asteroid_timer = (cfg.asteroid.spawn_interval_base / diff)
                .max(cfg.asteroid.spawn_interval_min);
            let count =
                (1 + score / cfg.asteroid.score_spawn_factor).min(cfg.asteroid.max_spawn_count);
            for _ in 0..count {
                batch.asteroids.push(self.roll_asteroid(diff, ship_pos, cfg, rng));
            }
        }

        self.ufo_timer -= dt;
        if self.ufo_timer <= 0.0 {
            self.ufo_timer = cfg.ufo.spawn_every / diff;
            let want = (1 + (diff / 2.0) as u32).min(cfg.ufo.max_concurrent);
            batch.ufos = want.saturating_sub(live_ufos);
        }

        self.barrel_elapsed += dt;
        if self.barrel_elapsed >= self.next_barrel / diff {
            self.barrel_elapsed = 0.0;
            self.next_barrel = rng
                .random_range(cfg.barrel.spawn_interval_min..cfg.barrel.spawn_interval_max);
            batch.barrel = Some(BarrelSeed {
                x: rng.random_range(20.0..cfg.arena.x - 20.0),
                target_y: rng.random_range(cfg.arena.y * 0.5..cfg.arena.y - 40.0),
            });
        }

        batch
    }

    fn roll_asteroid(
        &mut self,
        diff: f32,
        ship_pos: Vec2,
        cfg: &GameConfig,
        rng: &mut impl Rng,
    ) -> AsteroidSeed {
        // Higher difficulty shifts mass toward the smaller, faster classes
        let prob_small = ((diff - 1.0) * 0.05).min(0.2);
        let prob_medium = ((diff - 1.0) * 0.15).min(0.4);
        let roll: f32 = rng.random_range(0.0..1.0);
        let size = if roll < prob_small {
            SizeClass::Small
        } else if roll < prob_small + prob_medium {
            SizeClass::Medium
        } else {
            SizeClass::Large
        };

        // Edge spawns too close to the ship get re-rolled a bounded number
        // of times; the last roll stands regardless.
        let mut pos = rand_edge_pos(rng, cfg.arena);
        for _ in 0..cfg.asteroid.spawn_max_tries {
            if pos.distance(ship_pos) >= cfg.asteroid.spawn_min_dist {
                break;
            }
            pos = rand_edge_pos(rng, cfg.arena);
        }

        let speed = rng.random_range(cfg.asteroid.vel_min..cfg.asteroid.vel_max)
            * (1.0 + (diff - 1.0) * cfg.asteroid.speed_scale);
        AsteroidSeed {
            pos,
            vel: rand_unit_vec(rng) * speed,
            size,
        }
    }
}
